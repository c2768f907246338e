//! JPEG encoding for rectangular exports.
//!
//! JPEG carries no alpha channel. RGBA input is flattened onto opaque black
//! first, matching what a 2D canvas does when asked for `image/jpeg`.

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::io::Cursor;

use super::{validate_buffer, EncodeError};

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, clamped)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(pixels, width, height, 3)?;

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode RGBA pixel data to JPEG bytes, compositing over black.
pub fn encode_jpeg_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate_buffer(pixels, width, height, 4)?;
    let rgb = flatten_onto_black(pixels);
    encode_jpeg(&rgb, width, height, quality)
}

fn flatten_onto_black(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u16;
        for &c in &px[..3] {
            // Rounded c * a / 255
            rgb.push(((c as u16 * a + 127) / 255) as u8);
        }
    }
    rgb
}
