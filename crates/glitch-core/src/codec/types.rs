//! Core types shared by the image codec and the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GlitchError;

/// Bytes per pixel in a [`PixelBuffer`] (RGBA).
pub const BYTES_PER_PIXEL: usize = 4;

/// Error types for image codec operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes are not an image format the codec understands.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image data is corrupted or truncated beyond what the decoder accepts.
    #[error("Corrupted or incomplete image data: {0}")]
    CorruptedData(String),

    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Encoding failed inside the encoder.
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Decoded image data with RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a pixel buffer. The data is not checked; see [`PixelBuffer::validate`].
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Create a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = (width as usize) * (height as usize);
        let data = rgba.iter().copied().cycle().take(count * BYTES_PER_PIXEL).collect();
        Self::new(width, height, data)
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbaImage`, or `None` if the data length is wrong.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
    }

    /// Number of data bytes the dimensions call for.
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(BYTES_PER_PIXEL)
    }

    /// Structural check: non-zero dimensions and a matching data length.
    pub fn validate(&self) -> Result<(), GlitchError> {
        if self.width == 0 || self.height == 0 {
            return Err(GlitchError::InvalidImageData(format!(
                "dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        match self.expected_len() {
            Some(expected) if expected == self.data.len() => Ok(()),
            Some(expected) => Err(GlitchError::InvalidImageData(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                self.width,
                self.height,
                self.data.len()
            ))),
            None => Err(GlitchError::InvalidImageData(format!(
                "{}x{} is too large",
                self.width, self.height
            ))),
        }
    }

    /// Number of pixels the dimensions describe.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}
