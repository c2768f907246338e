//! Cropkit WASM - WebAssembly bindings for Cropkit
//!
//! This crate exposes the cropkit-core cropper to JavaScript/TypeScript.
//!
//! # Module Structure
//!
//! - `controller` - Stateful cropper driven by page events
//! - `extract` - Stateless crop-and-encode functions
//! - `types` - WASM-compatible wrapper types
//! - `browser` - Download links and alerts
//! - `logger` - `log` backend for the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropController } from '@cropkit/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new JsCropController({ jpeg_quality: 85 });
//! cropper.select_preset('circle');
//! ```

use wasm_bindgen::prelude::*;

mod browser;
mod controller;
mod extract;
mod logger;
mod types;

// Re-export public types
pub use controller::JsCropController;
pub use extract::{extract_crop, extract_crop_bytes};
pub use types::JsDownload;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// The default cropper configuration as a plain object.
#[wasm_bindgen]
pub fn default_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&cropkit_core::CropperConfig::default())
        .map_err(types::to_js_error)
}

/// Change the console log level (`"off"`, `"error"`, `"warn"`, `"info"`,
/// `"debug"` or `"trace"`).
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level = logger::parse_level(level)
        .ok_or_else(|| types::to_js_error(format!("unknown log level: {}", level)))?;
    logger::init(level);
    Ok(())
}
