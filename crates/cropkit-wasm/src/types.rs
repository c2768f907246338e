//! WASM-compatible wrapper types.
//!
//! This module converts between the plain JavaScript objects the crop widget
//! produces and the core Cropkit types.

use cropkit_core::{Download, PercentRect, PixelRect};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// An area as reported by the crop widget: `{ x, y, width, height }`.
///
/// Used for both the percentage and the pixel variant; values may be
/// fractional.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct JsArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl JsArea {
    pub(crate) fn to_pixels(self) -> PixelRect {
        PixelRect::from_f64(self.x, self.y, self.width, self.height)
    }

    pub(crate) fn to_percent(self) -> PercentRect {
        PercentRect::new(self.x, self.y, self.width, self.height)
    }
}

/// Parse a widget area object.
pub(crate) fn area_from_js(value: JsValue) -> Result<JsArea, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| to_js_error(format!("invalid area: {}", e)))
}

/// Wrap any displayable error as a JavaScript `Error`.
pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// A finished export handed to JavaScript.
///
/// `data_url` can be used directly as the `href` of a download link.
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsDownload {
    filename: String,
    mime_type: String,
    data_url: String,
    width: u32,
    height: u32,
}

#[wasm_bindgen]
impl JsDownload {
    #[wasm_bindgen(getter)]
    pub fn filename(&self) -> String {
        self.filename.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.mime_type.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn data_url(&self) -> String {
        self.data_url.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl From<Download> for JsDownload {
    fn from(download: Download) -> Self {
        Self {
            filename: download.filename,
            mime_type: download.mime_type,
            data_url: download.data_url,
            width: download.width,
            height: download.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_to_pixels_rounds() {
        let area = JsArea {
            x: 99.6,
            y: 50.0,
            width: 200.4,
            height: 199.5,
        };
        assert_eq!(area.to_pixels(), PixelRect::new(100, 50, 200, 200));
    }

    #[test]
    fn test_area_to_percent() {
        let area = JsArea {
            x: 12.5,
            y: 8.3,
            width: 25.0,
            height: 33.3,
        };
        assert_eq!(area.to_percent(), PercentRect::new(12.5, 8.3, 25.0, 33.3));
    }

    #[test]
    fn test_download_conversion() {
        let download = Download {
            filename: "cropped-image.jpeg".to_string(),
            mime_type: "image/jpeg".to_string(),
            data_url: "data:image/jpeg;base64,AA==".to_string(),
            width: 10,
            height: 20,
        };
        let js = JsDownload::from(download);
        assert_eq!(js.filename(), "cropped-image.jpeg");
        assert_eq!(js.mime_type(), "image/jpeg");
        assert_eq!((js.width(), js.height()), (10, 20));
    }
}
