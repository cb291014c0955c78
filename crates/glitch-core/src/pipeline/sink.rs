//! Output stages: deferred operations that turn the glitched data URL into
//! the shape the caller asked for.

use crate::base64::decode_data_url;
use crate::codec::{ImageCodec, ImageStream, JpegStreamOptions, PixelBuffer, StreamFormat};
use crate::error::GlitchError;

/// A recorded output operation, run once on the glitched data URL.
pub(crate) type OutputStage<T> = Box<dyn FnOnce(&dyn ImageCodec, String) -> Result<T, GlitchError>>;

pub(crate) fn data_url() -> OutputStage<String> {
    Box::new(|_codec: &dyn ImageCodec, data_url: String| -> Result<String, GlitchError> {
        Ok(data_url)
    })
}

pub(crate) fn image_data() -> OutputStage<PixelBuffer> {
    Box::new(|codec: &dyn ImageCodec, data_url: String| load(codec, &data_url))
}

/// PNG-encoded bytes.
pub(crate) fn png_bytes() -> OutputStage<Vec<u8>> {
    Box::new(|codec: &dyn ImageCodec, data_url: String| -> Result<Vec<u8>, GlitchError> {
        let pixels = load(codec, &data_url)?;
        Ok(codec.encode_png(&pixels)?)
    })
}

pub(crate) fn png_stream() -> OutputStage<ImageStream> {
    Box::new(|codec: &dyn ImageCodec, data_url: String| -> Result<ImageStream, GlitchError> {
        let pixels = load(codec, &data_url)?;
        let png = codec.encode_png(&pixels)?;
        Ok(ImageStream::new(png, StreamFormat::Png, 0))
    })
}

pub(crate) fn jpeg_stream(options: JpegStreamOptions) -> OutputStage<ImageStream> {
    Box::new(move |codec: &dyn ImageCodec, data_url: String| -> Result<ImageStream, GlitchError> {
        let pixels = load(codec, &data_url)?;
        let jpeg = codec.encode_jpeg_stream(&pixels, &options)?;
        Ok(ImageStream::new(jpeg, StreamFormat::Jpeg, options.bufsize))
    })
}

/// Decode the glitched JPEG back into pixels.
fn load(codec: &dyn ImageCodec, data_url: &str) -> Result<PixelBuffer, GlitchError> {
    let bytes = decode_data_url(data_url)?;
    Ok(codec.decode(&bytes)?)
}
