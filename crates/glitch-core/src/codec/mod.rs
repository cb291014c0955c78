//! Image codec seam for the glitch pipeline.
//!
//! The pipeline never touches pixels itself. It asks an [`ImageCodec`] to:
//! - decode source bytes into a [`PixelBuffer`]
//! - encode a pixel buffer to JPEG at the configured quality before corruption
//! - encode the glitched result into the requested output container
//!
//! [`DefaultCodec`] implements all of this with the `image` crate (JPEG and
//! PNG support). Hosts with their own decoder (a browser canvas, a GPU
//! pipeline) implement the trait instead.

mod decode;
mod encode;
mod stream;
mod types;

pub use decode::decode_image;
pub use encode::{encode_jpeg, encode_png};
pub use stream::{ImageStream, JpegStreamOptions, StreamFormat, DEFAULT_CHUNK_SIZE};
pub use types::{CodecError, PixelBuffer, BYTES_PER_PIXEL};

/// External image encode/decode capabilities used by the pipeline.
pub trait ImageCodec {
    /// Decode an encoded image into RGBA pixels.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, CodecError>;

    /// Encode pixels to baseline JPEG at `quality` (0-100).
    fn encode_jpeg(&self, pixels: &PixelBuffer, quality: u8) -> Result<Vec<u8>, CodecError>;

    /// Encode pixels to PNG.
    fn encode_png(&self, pixels: &PixelBuffer) -> Result<Vec<u8>, CodecError>;

    /// Encode pixels for a JPEG output stream.
    ///
    /// Codecs without progressive support fall back to baseline.
    fn encode_jpeg_stream(
        &self,
        pixels: &PixelBuffer,
        options: &JpegStreamOptions,
    ) -> Result<Vec<u8>, CodecError> {
        if options.progressive {
            log::warn!("Progressive JPEG output is not supported, writing baseline");
        }
        self.encode_jpeg(pixels, options.quality)
    }
}

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodec;

impl ImageCodec for DefaultCodec {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
        decode_image(bytes)
    }

    fn encode_jpeg(&self, pixels: &PixelBuffer, quality: u8) -> Result<Vec<u8>, CodecError> {
        encode_jpeg(pixels, quality)
    }

    fn encode_png(&self, pixels: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
        encode_png(pixels)
    }
}
