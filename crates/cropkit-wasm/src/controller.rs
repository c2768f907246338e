//! Stateful cropper bindings.
//!
//! [`JsCropController`] owns the loaded image and the crop settings so the
//! page only forwards events: file selection, widget callbacks, slider and
//! button input, and the crop button.
//!
//! ```typescript
//! const cropper = new JsCropController();
//! input.onchange = async () => {
//!   const ticket = cropper.begin_load();
//!   const bytes = new Uint8Array(await input.files[0].arrayBuffer());
//!   cropper.finish_load(ticket, bytes);
//! };
//! widget.onCropComplete = (area, pixels) => cropper.on_crop_complete(area, pixels);
//! button.onclick = () => cropper.crop_and_download();
//! ```

use crate::browser;
use crate::types::{area_from_js, to_js_error, JsDownload};
use cropkit_core::{
    AspectRatio, CropController, CropPosition, CropperConfig, Download, LoadTicket, OutputShape,
    Preset,
};
use wasm_bindgen::prelude::*;

/// Image cropper state held on the WASM side.
#[wasm_bindgen]
pub struct JsCropController {
    inner: CropController,
}

impl JsCropController {
    fn from_config(config: CropperConfig) -> Result<Self, String> {
        CropController::new(config)
            .map(|inner| Self { inner })
            .map_err(|e| e.to_string())
    }

    fn download(&self) -> Result<Option<Download>, String> {
        self.inner.export_crop().map_err(|e| e.to_string())
    }
}

#[wasm_bindgen]
impl JsCropController {
    /// Create a cropper. `config` is an optional partial `CropperConfig`
    /// object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropController, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            CropperConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| to_js_error(format!("invalid config: {}", e)))?
        };
        Self::from_config(config).map_err(to_js_error)
    }

    /// Start loading a newly selected file. Pass the returned ticket to
    /// `finish_load` / `fail_load` once the file has been read.
    pub fn begin_load(&mut self) -> u32 {
        self.inner.begin_load().id()
    }

    /// Deliver the raw bytes of the file selected for `ticket`.
    pub fn finish_load(&mut self, ticket: u32, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner
            .finish_load(LoadTicket::from_id(ticket), bytes)
            .map_err(to_js_error)
    }

    /// Deliver a `FileReader.readAsDataURL` result for `ticket`.
    pub fn finish_load_data_url(&mut self, ticket: u32, url: &str) -> Result<(), JsValue> {
        self.inner
            .finish_load_data_url(LoadTicket::from_id(ticket), url)
            .map_err(to_js_error)
    }

    pub fn fail_load(&mut self, ticket: u32, reason: &str) -> Result<(), JsValue> {
        self.inner
            .fail_load(LoadTicket::from_id(ticket), reason)
            .map_err(to_js_error)
    }

    /// Select one of the `"square"`, `"free"` or `"circle"` presets.
    pub fn select_preset(&mut self, name: &str) -> Result<(), JsValue> {
        let preset: Preset = name.parse().map_err(to_js_error)?;
        self.inner.select_preset(preset);
        Ok(())
    }

    /// Set an explicit aspect ratio (`undefined` for free-form) and shape.
    pub fn set_aspect(&mut self, aspect: Option<f64>, round: bool) -> Result<(), JsValue> {
        let aspect = match aspect {
            Some(ratio) => Some(
                AspectRatio::new(ratio)
                    .ok_or_else(|| to_js_error(format!("invalid aspect ratio: {}", ratio)))?,
            ),
            None => None,
        };
        let shape = if round {
            OutputShape::Circle
        } else {
            OutputShape::Rectangle
        };
        self.inner.set_aspect(aspect, shape);
        Ok(())
    }

    /// Crop widget completion callback. Returns `false` when ignored
    /// because no image is loaded.
    ///
    /// `pixels` may be omitted, in which case it is derived from the
    /// percentage area and the loaded image size.
    pub fn on_crop_complete(&mut self, area: JsValue, pixels: JsValue) -> Result<bool, JsValue> {
        let percent = area_from_js(area)?.to_percent();
        if pixels.is_undefined() || pixels.is_null() {
            return Ok(self.inner.on_crop_percent_changed(percent));
        }
        let pixels = area_from_js(pixels)?.to_pixels();
        Ok(self.inner.on_crop_region_changed(percent, pixels))
    }

    pub fn set_crop_position(&mut self, x: f64, y: f64) {
        self.inner.set_crop_position(CropPosition { x, y });
    }

    /// Set zoom; returns the clamped value actually stored.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.inner.set_zoom(zoom)
    }

    /// Crop with the current settings without downloading.
    ///
    /// Returns `undefined` when no image or crop area is available yet.
    pub fn export_crop(&self) -> Result<Option<JsDownload>, JsValue> {
        self.download()
            .map(|download| download.map(JsDownload::from))
            .map_err(to_js_error)
    }

    /// Crop and trigger a browser download.
    ///
    /// Returns `true` if a download was started. Failures are logged and
    /// reported to the user with an alert.
    pub fn crop_and_download(&self) -> bool {
        let result = self.download().map_err(to_js_error).and_then(|download| {
            match download {
                Some(download) => browser::trigger_download(&download).map(|()| true),
                None => Ok(false),
            }
        });
        match result {
            Ok(started) => started,
            Err(err) => {
                log::error!("crop failed: {:?}", err);
                browser::alert(browser::EXPORT_FAILED_MESSAGE);
                false
            }
        }
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom()
    }

    #[wasm_bindgen(getter)]
    pub fn crop_x(&self) -> f64 {
        self.inner.position().x
    }

    #[wasm_bindgen(getter)]
    pub fn crop_y(&self) -> f64 {
        self.inner.position().y
    }

    /// Current aspect ratio, `undefined` when free-form.
    #[wasm_bindgen(getter)]
    pub fn aspect(&self) -> Option<f64> {
        self.inner.aspect().map(AspectRatio::value)
    }

    #[wasm_bindgen(getter)]
    pub fn is_round(&self) -> bool {
        self.inner.shape() == OutputShape::Circle
    }

    /// Name of the matching preset, for highlighting the active button.
    #[wasm_bindgen(getter)]
    pub fn preset(&self) -> Option<String> {
        self.inner.preset().map(preset_name)
    }

    #[wasm_bindgen(getter)]
    pub fn can_export(&self) -> bool {
        self.inner.can_export()
    }

    #[wasm_bindgen(getter)]
    pub fn is_pending(&self) -> bool {
        self.inner.is_pending()
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.source().is_some()
    }

    /// Message of the last failed load, if the latest load failed.
    #[wasm_bindgen(getter)]
    pub fn last_error(&self) -> Option<String> {
        self.inner.last_error().map(ToString::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn image_width(&self) -> Option<u32> {
        self.inner.source().map(|s| s.width)
    }

    #[wasm_bindgen(getter)]
    pub fn image_height(&self) -> Option<u32> {
        self.inner.source().map(|s| s.height)
    }

    #[wasm_bindgen(getter)]
    pub fn zoom_min(&self) -> f64 {
        self.inner.config().zoom.min
    }

    #[wasm_bindgen(getter)]
    pub fn zoom_max(&self) -> f64 {
        self.inner.config().zoom.max
    }

    #[wasm_bindgen(getter)]
    pub fn zoom_step(&self) -> f64 {
        self.inner.config().zoom.step
    }
}

fn preset_name(preset: Preset) -> String {
    match preset {
        Preset::Square => "square",
        Preset::Free => "free",
        Preset::Circle => "circle",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropkit_core::{PercentRect, PixelRect};
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    pub(super) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([10, 120, 220, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn loaded() -> JsCropController {
        let mut cropper = JsCropController::from_config(CropperConfig::default()).unwrap();
        let ticket = cropper.begin_load();
        cropper.inner.finish_load(LoadTicket::from_id(ticket), &png_bytes(80, 60)).unwrap();
        cropper
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = CropperConfig::default();
        config.jpeg_quality = 0;
        assert!(JsCropController::from_config(config).is_err());
    }

    #[test]
    fn test_defaults_exposed() {
        let cropper = JsCropController::from_config(CropperConfig::default()).unwrap();
        assert_eq!(cropper.zoom(), 1.0);
        assert_eq!((cropper.zoom_min(), cropper.zoom_max()), (1.0, 3.0));
        assert_eq!(cropper.aspect(), Some(1.0));
        assert!(!cropper.is_round());
        assert_eq!(cropper.preset().as_deref(), Some("square"));
        assert!(!cropper.has_image());
        assert!(!cropper.can_export());
    }

    #[test]
    fn test_tickets_are_sequential() {
        let mut cropper = JsCropController::from_config(CropperConfig::default()).unwrap();
        let first = cropper.begin_load();
        let second = cropper.begin_load();
        assert_ne!(first, second);
        assert!(cropper.is_pending());
    }

    #[test]
    fn test_loaded_image_dimensions() {
        let cropper = loaded();
        assert!(cropper.has_image());
        assert_eq!(cropper.image_width(), Some(80));
        assert_eq!(cropper.image_height(), Some(60));
        assert_eq!(cropper.last_error(), None);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut cropper = loaded();
        assert_eq!(cropper.set_zoom(7.5), 3.0);
        assert_eq!(cropper.zoom(), 3.0);
    }

    #[test]
    fn test_crop_position() {
        let mut cropper = loaded();
        cropper.set_crop_position(-12.0, 4.5);
        assert_eq!((cropper.crop_x(), cropper.crop_y()), (-12.0, 4.5));
    }

    #[test]
    fn test_round_preset_exports_png() {
        let mut cropper = loaded();
        cropper.inner.select_preset(Preset::Circle);
        assert!(cropper.is_round());
        assert_eq!(cropper.preset().as_deref(), Some("circle"));

        cropper.inner.on_crop_region_changed(
            PercentRect::new(0.0, 0.0, 50.0, 50.0),
            PixelRect::new(10, 10, 40, 40),
        );
        let download = cropper.download().unwrap().unwrap();
        assert_eq!(download.filename, "cropped-image-round.png");
        assert_eq!(download.mime_type, "image/png");
        assert_eq!((download.width, download.height), (40, 40));
    }

    #[test]
    fn test_oversized_area_reports_error() {
        let mut cropper = loaded();
        cropper.inner.on_crop_region_changed(
            PercentRect::new(0.0, 0.0, 100.0, 100.0),
            PixelRect::from_f64(0.0, 0.0, 1e12, 1e12),
        );
        let err = cropper.download().unwrap_err();
        assert!(err.contains("too large"), "{}", err);
    }

    #[test]
    fn test_export_without_area_is_none() {
        let cropper = loaded();
        assert_eq!(cropper.download(), Ok(None));
    }

    #[test]
    fn test_preset_names_parse_back() {
        for preset in Preset::ALL {
            assert_eq!(preset_name(preset).parse::<Preset>(), Ok(preset));
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_new_with_undefined_config() {
        let cropper = JsCropController::new(JsValue::UNDEFINED).unwrap();
        assert_eq!(cropper.zoom(), 1.0);
    }

    #[wasm_bindgen_test]
    fn test_select_unknown_preset_fails() {
        let mut cropper = JsCropController::new(JsValue::NULL).unwrap();
        assert!(cropper.select_preset("hexagon").is_err());
        assert!(cropper.select_preset("round").is_ok());
        assert!(cropper.is_round());
    }

    #[wasm_bindgen_test]
    fn test_set_aspect_rejects_zero() {
        let mut cropper = JsCropController::new(JsValue::NULL).unwrap();
        assert!(cropper.set_aspect(Some(0.0), false).is_err());
        assert!(cropper.set_aspect(None, false).is_ok());
        assert_eq!(cropper.preset().as_deref(), Some("free"));
    }

    #[wasm_bindgen_test]
    fn test_stale_ticket_rejected() {
        let mut cropper = JsCropController::new(JsValue::NULL).unwrap();
        let first = cropper.begin_load();
        let _second = cropper.begin_load();
        assert!(cropper.finish_load(first, &[1, 2, 3]).is_err());
        assert!(cropper.is_pending());
    }

    #[wasm_bindgen_test]
    fn test_crop_complete_percent_only() {
        let mut cropper = JsCropController::new(JsValue::NULL).unwrap();
        let ticket = cropper.begin_load();
        cropper.finish_load(ticket, &super::tests::png_bytes(20, 20)).unwrap();
        assert!(cropper.on_crop_complete(area(), JsValue::UNDEFINED).unwrap());
        assert!(cropper.can_export());
    }

    #[wasm_bindgen_test]
    fn test_crop_complete_without_image_ignored() {
        let mut cropper = JsCropController::new(JsValue::NULL).unwrap();
        assert!(!cropper.on_crop_complete(area(), area()).unwrap());
    }

    fn area() -> JsValue {
        let obj = js_sys::Object::new();
        for (key, value) in [("x", 0.0), ("y", 0.0), ("width", 10.0), ("height", 10.0)] {
            js_sys::Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_f64(value)).unwrap();
        }
        obj.into()
    }
}
