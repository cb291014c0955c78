//! Glitch pipeline WASM bindings.
//!
//! Every binding runs one complete pipeline: the source and the parameters go
//! in, the glitched image comes out in the requested shape.
//!
//! Parameters are passed as a plain object (`{ amount, iterations, quality, seed }`).
//! Missing or non-numeric fields fall back to their defaults, and `undefined`,
//! `null`, arrays and non-object values mean "all defaults".

use std::io::Read;

use crate::types::JsPixelBuffer;
use glitch_core::{glitch, sanitize, GlitchError, JpegStreamOptions, PixelBuffer, RawGlitchParams};
use js_sys::{Array, ArrayBuffer, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Sanitize a parameter object and return the values the pipeline would use.
///
/// # Example
///
/// ```typescript
/// sanitize_params({ amount: 150, seed: "7" });
/// // { amount: 100, iterations: 20, quality: 30, seed: 25 }
/// ```
#[wasm_bindgen]
pub fn sanitize_params(params: JsValue) -> Result<JsValue, JsValue> {
    let params = sanitize(&params_from_js(params));
    serde_wasm_bindgen::to_value(&params)
        .map_err(|e| JsValue::from_str(&format!("Failed to serialize params: {}", e)))
}

/// Glitch an encoded image (JPEG or PNG) and return a JPEG data URL.
///
/// `source` must be a `Uint8Array` or an `ArrayBuffer`.
///
/// # Example
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// img.src = glitch_to_data_url(bytes, { amount: 10, seed: 45 });
/// ```
#[wasm_bindgen]
pub fn glitch_to_data_url(source: JsValue, params: JsValue) -> Result<String, JsValue> {
    let bytes = source_bytes(&source).map_err(to_js_error)?;
    data_url_from_bytes(bytes, params_from_js(params)).map_err(to_js_error)
}

/// Glitch an encoded image and return PNG bytes.
#[wasm_bindgen]
pub fn glitch_to_png(source: JsValue, params: JsValue) -> Result<Vec<u8>, JsValue> {
    let bytes = source_bytes(&source).map_err(to_js_error)?;
    png_from_bytes(bytes, params_from_js(params)).map_err(to_js_error)
}

/// Glitch an encoded image and return JPEG bytes.
///
/// `options` follows `{ bufsize, quality, progressive }`. Progressive
/// encoding is not supported and falls back to baseline.
#[wasm_bindgen]
pub fn glitch_to_jpeg(
    source: JsValue,
    params: JsValue,
    options: JsValue,
) -> Result<Vec<u8>, JsValue> {
    let bytes = source_bytes(&source).map_err(to_js_error)?;
    jpeg_from_bytes(bytes, params_from_js(params), stream_options_from_js(options))
        .map_err(to_js_error)
}

/// Glitch a pixel buffer and return the glitched pixels.
///
/// # Example
///
/// ```typescript
/// const src = ctx.getImageData(0, 0, w, h);
/// const input = new JsPixelBuffer(src.width, src.height, new Uint8Array(src.data.buffer));
/// const out = glitch_image_data(input, { iterations: 40 });
/// ctx.putImageData(new ImageData(new Uint8ClampedArray(out.data()), out.width, out.height), 0, 0);
/// input.free();
/// out.free();
/// ```
#[wasm_bindgen]
pub fn glitch_image_data(
    image: &JsPixelBuffer,
    params: JsValue,
) -> Result<JsPixelBuffer, JsValue> {
    pixels_from_pixels(image.to_pixels(), params_from_js(params))
        .map(JsPixelBuffer::from_pixels)
        .map_err(to_js_error)
}

/// Glitch a pixel buffer and return a JPEG data URL.
#[wasm_bindgen]
pub fn glitch_image_data_to_data_url(
    image: &JsPixelBuffer,
    params: JsValue,
) -> Result<String, JsValue> {
    glitch(params_from_js(params))
        .from_image_data(image.to_pixels())
        .to_data_url()
        .map_err(to_js_error)
}

pub(crate) fn data_url_from_bytes(
    bytes: Vec<u8>,
    params: RawGlitchParams,
) -> Result<String, GlitchError> {
    glitch(params).from_bytes(bytes).to_data_url()
}

pub(crate) fn png_from_bytes(
    bytes: Vec<u8>,
    params: RawGlitchParams,
) -> Result<Vec<u8>, GlitchError> {
    glitch(params).from_bytes(bytes).to_bytes()
}

pub(crate) fn jpeg_from_bytes(
    bytes: Vec<u8>,
    params: RawGlitchParams,
    options: JpegStreamOptions,
) -> Result<Vec<u8>, GlitchError> {
    let mut stream = glitch(params).from_bytes(bytes).to_jpeg_stream(options)?;
    let mut jpeg = Vec::with_capacity(stream.remaining());
    stream.read_to_end(&mut jpeg)?;
    Ok(jpeg)
}

pub(crate) fn pixels_from_pixels(
    pixels: PixelBuffer,
    params: RawGlitchParams,
) -> Result<PixelBuffer, GlitchError> {
    glitch(params).from_image_data(pixels).to_image_data()
}

fn source_bytes(source: &JsValue) -> Result<Vec<u8>, GlitchError> {
    if let Some(array) = source.dyn_ref::<Uint8Array>() {
        Ok(array.to_vec())
    } else if let Some(buffer) = source.dyn_ref::<ArrayBuffer>() {
        Ok(Uint8Array::new(buffer).to_vec())
    } else {
        Err(GlitchError::InvalidSource(
            "expected a Uint8Array or an ArrayBuffer".to_string(),
        ))
    }
}

fn params_from_js(value: JsValue) -> RawGlitchParams {
    if !value.is_object() || Array::is_array(&value) {
        return RawGlitchParams::default();
    }
    serde_wasm_bindgen::from_value(value).unwrap_or_default()
}

fn stream_options_from_js(value: JsValue) -> JpegStreamOptions {
    if !value.is_object() {
        return JpegStreamOptions::default();
    }
    let mut options: JpegStreamOptions = serde_wasm_bindgen::from_value(value).unwrap_or_default();
    if options.quality == 0 {
        options.quality = JpegStreamOptions::default().quality;
    }
    options
}

fn to_js_error(err: GlitchError) -> JsValue {
    let message = err.to_string();
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&format!("glitch failed: {}", message)));
    JsValue::from_str(&message)
}
