//! Stateless crop extraction bindings.
//!
//! For pages that keep their own state and only need the pixel work done:
//! pass the file bytes and the pixel area reported by the crop widget, get
//! the encoded crop back.
//!
//! ```typescript
//! import { extract_crop } from '@cropkit/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const url = extract_crop(bytes, croppedAreaPixels, true);
//! link.href = url;
//! ```

use crate::types::{area_from_js, to_js_error};
use cropkit_core::config::DEFAULT_JPEG_QUALITY;
use cropkit_core::{EncodedImage, ExtractError, OutputShape, PixelRect};
use wasm_bindgen::prelude::*;

fn shape_for(circular: bool) -> OutputShape {
    if circular {
        OutputShape::Circle
    } else {
        OutputShape::Rectangle
    }
}

fn extract_encoded(
    bytes: &[u8],
    rect: PixelRect,
    circular: bool,
    quality: Option<u8>,
) -> Result<EncodedImage, ExtractError> {
    let quality = quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100);
    cropkit_core::extract_from_bytes(bytes, rect, shape_for(circular), quality)
}

/// Crop encoded image bytes and return the result as a data URL.
///
/// `area` is a `{ x, y, width, height }` object in source pixels. Circular
/// crops come back as PNG, rectangular ones as JPEG at `quality` (default 90).
#[wasm_bindgen]
pub fn extract_crop(
    bytes: &[u8],
    area: JsValue,
    circular: bool,
    quality: Option<u8>,
) -> Result<String, JsValue> {
    let rect = area_from_js(area)?.to_pixels();
    extract_encoded(bytes, rect, circular, quality)
        .map(|encoded| encoded.to_data_url())
        .map_err(to_js_error)
}

/// Crop encoded image bytes and return the encoded output bytes.
#[wasm_bindgen]
pub fn extract_crop_bytes(
    bytes: &[u8],
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    circular: bool,
    quality: Option<u8>,
) -> Result<Vec<u8>, JsValue> {
    extract_encoded(bytes, PixelRect::new(x, y, width, height), circular, quality)
        .map(|encoded| encoded.bytes)
        .map_err(to_js_error)
}
