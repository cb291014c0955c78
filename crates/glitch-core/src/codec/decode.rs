//! Image decoding with the `image` crate.

use image::ImageError;

use super::{CodecError, PixelBuffer};

/// Decode an encoded image (JPEG or PNG) into RGBA pixels.
///
/// # Errors
///
/// Returns `CodecError::InvalidFormat` if the bytes are not a recognized
/// image format. Returns `CodecError::CorruptedData` if the decoder fails.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
    let format = image::guess_format(bytes).map_err(|_| CodecError::InvalidFormat)?;

    let img = image::load_from_memory_with_format(bytes, format).map_err(|e| match e {
        ImageError::Unsupported(_) => CodecError::InvalidFormat,
        other => CodecError::CorruptedData(other.to_string()),
    })?;

    Ok(PixelBuffer::from_rgba_image(img.into_rgba8()))
}
