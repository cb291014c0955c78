//! WASM-compatible wrapper types for pixel data.
//!
//! This module wraps the core `PixelBuffer` in a JavaScript-friendly shape that
//! mirrors the browser's `ImageData` (width, height, RGBA bytes).

use glitch_core::PixelBuffer;
use wasm_bindgen::prelude::*;

/// An RGBA pixel buffer for JavaScript.
///
/// Build one from an `ImageData` with
/// `new JsPixelBuffer(img.width, img.height, new Uint8Array(img.data.buffer))`
/// and turn a result back into `ImageData` with
/// `new ImageData(new Uint8ClampedArray(buf.data()), buf.width, buf.height)`.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `data()` copies it out to a
/// `Uint8Array`. Call `free()` to release a large buffer early; otherwise the
/// wasm-bindgen finalizer reclaims it.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a buffer from dimensions and RGBA data (4 bytes per pixel, row-major).
    ///
    /// The length is not checked here. A mismatch is reported when the buffer
    /// is glitched.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> JsPixelBuffer {
        JsPixelBuffer {
            width,
            height,
            data,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the buffer (width * height * 4 for a valid buffer)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.data.len()
    }

    /// Returns the RGBA bytes as a Uint8Array copy.
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsPixelBuffer {
    pub(crate) fn from_pixels(pixels: PixelBuffer) -> Self {
        Self {
            width: pixels.width,
            height: pixels.height,
            data: pixels.data,
        }
    }

    /// Convert to a core `PixelBuffer`. Clones the pixel data.
    pub(crate) fn to_pixels(&self) -> PixelBuffer {
        PixelBuffer::new(self.width, self.height, self.data.clone())
    }
}
