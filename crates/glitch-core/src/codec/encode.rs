//! JPEG and PNG encoding with the `image` crate.
//!
//! JPEG has no alpha channel, so the alpha byte of every pixel is dropped
//! before encoding. PNG keeps all four channels.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::io::Cursor;

use super::{CodecError, PixelBuffer};

/// Encode RGBA pixels to baseline JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel buffer
/// * `quality` - JPEG quality; values outside 1-100 are clamped
///
/// # Errors
///
/// Returns `CodecError::InvalidDimensions` for a zero width or height and
/// `CodecError::InvalidPixelData` if the data length doesn't match.
pub fn encode_jpeg(pixels: &PixelBuffer, quality: u8) -> Result<Vec<u8>, CodecError> {
    let rgba = to_rgba_image(pixels)?;
    let rgb = DynamicImage::ImageRgba8(rgba).into_rgb8();

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(
            rgb.as_raw(),
            pixels.width,
            pixels.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| CodecError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode RGBA pixels to PNG bytes.
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>, CodecError> {
    let rgba = to_rgba_image(pixels)?;

    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut buffer);

    encoder
        .write_image(
            rgba.as_raw(),
            pixels.width,
            pixels.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| CodecError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

fn to_rgba_image(pixels: &PixelBuffer) -> Result<image::RgbaImage, CodecError> {
    if pixels.width == 0 || pixels.height == 0 {
        return Err(CodecError::InvalidDimensions {
            width: pixels.width,
            height: pixels.height,
        });
    }

    pixels
        .to_rgba_image()
        .ok_or_else(|| CodecError::InvalidPixelData {
            expected: pixels.expected_len().unwrap_or(usize::MAX),
            actual: pixels.data.len(),
        })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
