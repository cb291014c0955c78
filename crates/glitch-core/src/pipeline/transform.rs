//! The glitch transform: JPEG encode, base64 round trip, corruption.

use crate::base64::{decode_data_url, encode_data_url};
use crate::codec::{ImageCodec, PixelBuffer};
use crate::corrupt::corrupt_with_params;
use crate::error::GlitchError;
use crate::params::GlitchParams;

/// Glitch a pixel buffer and return the result as a JPEG data URL.
///
/// The pixels are encoded to JPEG at `params.quality`, wrapped in a data URL,
/// decoded back to bytes, corrupted and re-encoded.
///
/// # Errors
///
/// Returns `GlitchError::InvalidImageData` if the buffer fails the structural
/// check and `GlitchError::Codec` if JPEG encoding fails.
pub fn glitch_pixels(
    codec: &dyn ImageCodec,
    pixels: &PixelBuffer,
    params: &GlitchParams,
) -> Result<String, GlitchError> {
    pixels.validate()?;

    let jpeg = codec.encode_jpeg(pixels, params.quality)?;
    log::debug!(
        "Encoded {}x{} pixels to {} JPEG bytes at quality {}",
        pixels.width,
        pixels.height,
        jpeg.len(),
        params.quality
    );

    glitch_data_url(&encode_data_url(&jpeg), params)
}

/// Glitch a JPEG data URL produced by [`encode_data_url`].
pub fn glitch_data_url(data_url: &str, params: &GlitchParams) -> Result<String, GlitchError> {
    let mut bytes = decode_data_url(data_url)?;
    corrupt_with_params(&mut bytes, params);
    Ok(encode_data_url(&bytes))
}
