//! Glitch Core - JPEG glitch art library
//!
//! This crate produces glitch art from images by corrupting bytes in the
//! compressed scan data of a JPEG and round-tripping the result through a
//! base64 data URL codec.
//!
//! # Module Structure
//!
//! - `params` - Glitch parameters and their lenient sanitization
//! - `base64` - Data URL encoder/decoder for JPEG payloads
//! - `corrupt` - Start-Of-Scan location and deterministic byte corruption
//! - `codec` - Image codec seam and the default `image`-crate codec
//! - `pipeline` - Chainable single-use pipeline builder
//!
//! # Usage
//!
//! ```ignore
//! use glitch_core::{glitch, RawGlitchParams};
//!
//! let params = RawGlitchParams::new().amount(10.0).seed(45.0);
//! let data_url = glitch(params)
//!     .from_bytes(std::fs::read("photo.jpg")?)
//!     .to_data_url()?;
//! ```

pub mod base64;
pub mod codec;
pub mod corrupt;
pub mod error;
pub mod params;
pub mod pipeline;

pub use base64::{decode_data_url, encode_data_url, DATA_URL_PREFIX, DATA_URL_PREFIX_LEN};
pub use codec::{
    DefaultCodec, ImageCodec, ImageStream, JpegStreamOptions, PixelBuffer, StreamFormat,
};
pub use corrupt::{corrupt, locate_header_end};
pub use error::GlitchError;
pub use params::{sanitize, GlitchParams, RawGlitchParams, DEFAULT_PARAMS};
pub use pipeline::{glitch, glitch_data_url, glitch_pixels, Glitch};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_constant() {
        assert_eq!(
            DEFAULT_PARAMS,
            GlitchParams {
                amount: 35,
                iterations: 20,
                quality: 30,
                seed: 25,
            }
        );
    }

    #[test]
    fn test_glitch_from_image_data_to_data_url() {
        let pixels = PixelBuffer::filled(10, 10, [255, 64, 0, 255]);
        let url = glitch(RawGlitchParams::new())
            .from_image_data(pixels)
            .to_data_url()
            .unwrap();

        assert!(url.starts_with(DATA_URL_PREFIX));
        assert_eq!((url.len() - DATA_URL_PREFIX_LEN) % 4, 0);
        assert_eq!(&decode_data_url(&url).unwrap()[0..2], &[0xFF, 0xD8]);
    }
}
