//! Chainable glitch pipeline.
//!
//! A [`Glitch`] holds the sanitized parameters and two slots, one for the
//! input source and one for the output sink. Slots are tracked in the type:
//! `Glitch<I, O>` where each side is [`Unset`], [`InputSet`] or
//! [`OutputSet`]. Setting a slot that is still open returns a continuation;
//! setting the slot that completes the pair runs the pipeline and returns its
//! result. Input and output can be configured in either order:
//!
//! ```ignore
//! use glitch_core::{glitch, GlitchParams};
//!
//! let url = glitch(GlitchParams::default())
//!     .from_bytes(std::fs::read("photo.jpg")?)
//!     .to_data_url()?;
//!
//! let png = glitch(GlitchParams::default())
//!     .to_bytes()
//!     .from_reader(std::fs::File::open("photo.jpg")?)?;
//! ```
//!
//! While the other side is still unset, calling a setter of the same kind
//! again replaces the earlier choice. Running consumes the builder, so each
//! instance resolves exactly once.
//!
//! Execution is strictly sequential: the input stage fully resolves, then the
//! transform (JPEG encode at `quality`, data URL round trip, corruption), then
//! the output stage. The first error ends the run.

mod sink;
mod source;
mod transform;

use std::io::Read;

use crate::codec::{DefaultCodec, ImageCodec, ImageStream, JpegStreamOptions, PixelBuffer};
use crate::error::GlitchError;
use crate::params::{sanitize, GlitchParams, RawGlitchParams};

use sink::OutputStage;
use source::InputStage;

pub use transform::{glitch_data_url, glitch_pixels};

/// An empty slot.
pub struct Unset;

/// A recorded input source.
pub struct InputSet(InputStage);

/// A recorded output sink producing `T`.
pub struct OutputSet<T>(OutputStage<T>);

mod private {
    pub trait Sealed {}
    impl Sealed for super::Unset {}
    impl Sealed for super::InputSet {}
    impl<T> Sealed for super::OutputSet<T> {}
}

/// Slot state of a [`Glitch`] builder.
pub trait Slot: private::Sealed {
    fn is_set(&self) -> bool;
}

impl Slot for Unset {
    fn is_set(&self) -> bool {
        false
    }
}

impl Slot for InputSet {
    fn is_set(&self) -> bool {
        true
    }
}

impl<T> Slot for OutputSet<T> {
    fn is_set(&self) -> bool {
        true
    }
}

/// Single-use glitch pipeline builder.
pub struct Glitch<I = Unset, O = Unset> {
    params: GlitchParams,
    codec: Box<dyn ImageCodec>,
    input: I,
    output: O,
}

/// Start a pipeline with the default `image`-crate codec.
pub fn glitch(params: impl Into<RawGlitchParams>) -> Glitch {
    Glitch::new(params)
}

impl Glitch {
    /// Sanitize `params` and start with both slots empty.
    pub fn new(params: impl Into<RawGlitchParams>) -> Self {
        Self::with_codec(params, DefaultCodec)
    }

    /// Start a pipeline that uses a caller-supplied codec.
    pub fn with_codec(
        params: impl Into<RawGlitchParams>,
        codec: impl ImageCodec + 'static,
    ) -> Self {
        let params = sanitize(&params.into());
        log::debug!("New glitch pipeline with {:?}", params);

        Self {
            params,
            codec: Box::new(codec),
            input: Unset,
            output: Unset,
        }
    }
}

impl<I: Slot, O: Slot> Glitch<I, O> {
    /// The sanitized parameters.
    pub fn params(&self) -> &GlitchParams {
        &self.params
    }

    /// True once an input source is recorded.
    pub fn has_input(&self) -> bool {
        self.input.is_set()
    }

    /// True once an output sink is recorded.
    pub fn has_output(&self) -> bool {
        self.output.is_set()
    }

    /// True iff both slots are set.
    pub fn is_ready(&self) -> bool {
        self.has_input() && self.has_output()
    }
}

// Input setters while the output is still open.
#[allow(clippy::wrong_self_convention)]
impl<I> Glitch<I, Unset> {
    fn set_input(self, stage: InputStage) -> Glitch<InputSet, Unset> {
        Glitch {
            params: self.params,
            codec: self.codec,
            input: InputSet(stage),
            output: Unset,
        }
    }

    /// Read from encoded image bytes (JPEG, PNG).
    pub fn from_bytes(self, bytes: impl Into<Vec<u8>>) -> Glitch<InputSet, Unset> {
        self.set_input(source::bytes(bytes.into()))
    }

    /// Read from a stream; it is drained to the end when the pipeline runs.
    pub fn from_reader<R: Read + 'static>(self, reader: R) -> Glitch<InputSet, Unset> {
        self.set_input(source::reader(reader))
    }

    /// Read from decoded RGBA pixels.
    pub fn from_image_data(self, pixels: PixelBuffer) -> Glitch<InputSet, Unset> {
        self.set_input(source::image_data(pixels))
    }
}

// Input setters that complete the pipeline.
#[allow(clippy::wrong_self_convention)]
impl<T> Glitch<Unset, OutputSet<T>> {
    fn resolve_input(self, stage: InputStage) -> Result<T, GlitchError> {
        run(&self.params, self.codec.as_ref(), stage, self.output.0)
    }

    /// Read from encoded image bytes and run the pipeline.
    pub fn from_bytes(self, bytes: impl Into<Vec<u8>>) -> Result<T, GlitchError> {
        self.resolve_input(source::bytes(bytes.into()))
    }

    /// Drain a stream and run the pipeline.
    pub fn from_reader<R: Read + 'static>(self, reader: R) -> Result<T, GlitchError> {
        self.resolve_input(source::reader(reader))
    }

    /// Read from decoded RGBA pixels and run the pipeline.
    pub fn from_image_data(self, pixels: PixelBuffer) -> Result<T, GlitchError> {
        self.resolve_input(source::image_data(pixels))
    }
}

// Output setters while the input is still open.
#[allow(clippy::wrong_self_convention)]
impl<O> Glitch<Unset, O> {
    fn set_output<T>(self, stage: OutputStage<T>) -> Glitch<Unset, OutputSet<T>> {
        Glitch {
            params: self.params,
            codec: self.codec,
            input: Unset,
            output: OutputSet(stage),
        }
    }

    /// Resolve to the glitched `data:image/jpeg;base64,` URL.
    pub fn to_data_url(self) -> Glitch<Unset, OutputSet<String>> {
        self.set_output(sink::data_url())
    }

    /// Resolve to PNG-encoded bytes.
    pub fn to_bytes(self) -> Glitch<Unset, OutputSet<Vec<u8>>> {
        self.set_output(sink::png_bytes())
    }

    /// Resolve to decoded RGBA pixels.
    pub fn to_image_data(self) -> Glitch<Unset, OutputSet<PixelBuffer>> {
        self.set_output(sink::image_data())
    }

    /// Resolve to a PNG stream.
    pub fn to_png_stream(self) -> Glitch<Unset, OutputSet<ImageStream>> {
        self.set_output(sink::png_stream())
    }

    /// Resolve to a JPEG stream.
    pub fn to_jpeg_stream(
        self,
        options: JpegStreamOptions,
    ) -> Glitch<Unset, OutputSet<ImageStream>> {
        self.set_output(sink::jpeg_stream(options))
    }

    /// Alias of [`Glitch::to_jpeg_stream`].
    pub fn to_jpg_stream(
        self,
        options: JpegStreamOptions,
    ) -> Glitch<Unset, OutputSet<ImageStream>> {
        self.to_jpeg_stream(options)
    }
}

// Output setters that complete the pipeline.
#[allow(clippy::wrong_self_convention)]
impl Glitch<InputSet, Unset> {
    fn resolve_output<T>(self, stage: OutputStage<T>) -> Result<T, GlitchError> {
        run(&self.params, self.codec.as_ref(), self.input.0, stage)
    }

    /// Run the pipeline and return the glitched data URL.
    pub fn to_data_url(self) -> Result<String, GlitchError> {
        self.resolve_output(sink::data_url())
    }

    /// Run the pipeline and return PNG-encoded bytes.
    ///
    /// The glitched JPEG is decoded again first. On small images the corrupted
    /// offsets can fall inside the scan header, and decoding then fails with
    /// `GlitchError::Codec`.
    pub fn to_bytes(self) -> Result<Vec<u8>, GlitchError> {
        self.resolve_output(sink::png_bytes())
    }

    /// Run the pipeline and return decoded RGBA pixels.
    ///
    /// Fails with `GlitchError::Codec` when the corruption leaves a JPEG the
    /// codec rejects, which happens on small images (see [`Glitch::to_bytes`]).
    pub fn to_image_data(self) -> Result<PixelBuffer, GlitchError> {
        self.resolve_output(sink::image_data())
    }

    /// Run the pipeline and return a PNG stream.
    pub fn to_png_stream(self) -> Result<ImageStream, GlitchError> {
        self.resolve_output(sink::png_stream())
    }

    /// Run the pipeline and return a JPEG stream.
    pub fn to_jpeg_stream(self, options: JpegStreamOptions) -> Result<ImageStream, GlitchError> {
        self.resolve_output(sink::jpeg_stream(options))
    }

    /// Alias of [`Glitch::to_jpeg_stream`].
    pub fn to_jpg_stream(self, options: JpegStreamOptions) -> Result<ImageStream, GlitchError> {
        self.to_jpeg_stream(options)
    }
}

fn run<T>(
    params: &GlitchParams,
    codec: &dyn ImageCodec,
    input: InputStage,
    output: OutputStage<T>,
) -> Result<T, GlitchError> {
    let pixels = input(codec)?;
    log::debug!(
        "Input resolved to {}x{} ({} pixels)",
        pixels.width,
        pixels.height,
        pixels.pixel_count()
    );

    let data_url = glitch_pixels(codec, &pixels, params)?;
    log::debug!("Glitched data URL is {} characters", data_url.len());

    output(codec, data_url)
}
