//! Browser glue: download links and blocking alerts.

use cropkit_core::Download;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlAnchorElement;

use crate::types::to_js_error;

/// Shown when an export fails.
pub(crate) const EXPORT_FAILED_MESSAGE: &str = "An error occurred while cropping the image.";

/// Click a temporary `<a download>` pointing at the export.
///
/// Fails when there is no window, document or body to attach the link to.
pub(crate) fn trigger_download(download: &Download) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| to_js_error("no window available"))?;
    let document = window
        .document()
        .ok_or_else(|| to_js_error("no document available"))?;
    let body = document
        .body()
        .ok_or_else(|| to_js_error("document has no body"))?;

    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(&download.data_url);
    link.set_download(&download.filename);

    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Ok(())
}

/// Blocking `window.alert`. Silently does nothing without a window.
pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.alert_with_message(message) {
            log::warn!("alert failed: {:?}", err);
        }
    }
}
