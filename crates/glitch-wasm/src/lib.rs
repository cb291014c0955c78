//! Glitch WASM - WebAssembly bindings for the JPEG glitch pipeline
//!
//! This crate exposes the glitch-core pipeline to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `glitch` - Pipeline bindings (bytes or pixels in, data URL, PNG, JPEG or pixels out)
//! - `types` - WASM-compatible wrapper types for pixel data
//!
//! # Usage
//!
//! ```typescript
//! import init, { glitch_to_data_url } from '@glitch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! img.src = glitch_to_data_url(bytes, { amount: 10, seed: 45, iterations: 30 });
//! ```

use wasm_bindgen::prelude::*;

mod glitch;
mod types;

pub use glitch::{
    glitch_image_data, glitch_image_data_to_data_url, glitch_to_data_url, glitch_to_jpeg,
    glitch_to_png, sanitize_params,
};
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
