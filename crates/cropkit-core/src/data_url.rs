//! `data:` URL encoding and parsing.
//!
//! The page reads the selected file with `FileReader.readAsDataURL`, and
//! exports are handed back as data URLs for the download link, so both
//! directions live here.

use base64::{engine::general_purpose, Engine as _};

use crate::decode::DecodeError;

const BASE64_MARKER: &str = ";base64,";

/// Build a base64 data URL for `bytes` with the given mime type.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!(
        "data:{}{}{}",
        mime_type,
        BASE64_MARKER,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Parse an image data URL into its mime type and decoded payload.
///
/// Only base64 payloads with an `image/*` mime type are accepted.
pub fn decode(url: &str) -> Result<(String, Vec<u8>), DecodeError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing data: scheme".to_string()))?;

    let marker = rest
        .find(BASE64_MARKER)
        .ok_or_else(|| DecodeError::InvalidDataUrl("missing base64 marker".to_string()))?;

    // Drop parameters such as `;charset=...` from the mime type
    let mime_type = rest[..marker]
        .split(';')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    if !mime_type.starts_with("image/") {
        return Err(DecodeError::InvalidDataUrl(format!(
            "not an image mime type: {:?}",
            mime_type
        )));
    }

    let bytes = general_purpose::STANDARD
        .decode(&rest[marker + BASE64_MARKER.len()..])
        .map_err(|e| DecodeError::InvalidDataUrl(format!("base64 decode failed: {}", e)))?;

    Ok((mime_type, bytes))
}
