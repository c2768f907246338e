//! Source image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation, SourceImage};

/// Decode any supported image (JPEG, PNG, GIF, WebP, BMP) from bytes.
///
/// The format is sniffed from the content, not from a file name. EXIF
/// orientation is applied so that the pixel grid matches what a browser
/// displays, and the result is always RGBA8.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized.
/// Returns `DecodeError::CorruptedFile` if decoding fails part way.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let orientation = extract_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    log::debug!(
        "decoded {}x{} image (orientation {:?})",
        oriented.width(),
        oriented.height(),
        orientation
    );

    Ok(SourceImage::from_rgba_image(oriented.into_rgba8()))
}

/// Decode an image after checking it against a byte size limit.
pub fn decode_image_with_limit(bytes: &[u8], max_size: u64) -> Result<SourceImage, DecodeError> {
    let size = bytes.len() as u64;
    if size > max_size {
        return Err(DecodeError::TooLarge {
            size,
            limit: max_size,
        });
    }
    decode_image(bytes)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
