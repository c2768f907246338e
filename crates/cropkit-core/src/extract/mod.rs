//! Crop extraction: turn a source image and a pixel rectangle into an
//! encoded output image.
//!
//! # Pipeline
//!
//! 1. Allocate a transparent surface exactly `rect.width x rect.height`
//! 2. Copy the source region onto it at the origin (no scaling)
//! 3. Circle: draw that surface into a second one through the inscribed
//!    circular clip and encode PNG
//! 4. Rectangle: encode the first surface as JPEG
//!
//! Squareness is not enforced for circles. A non-square rectangle yields a
//! circle of radius `min(width, height) / 2` centred in the output.

mod circle;
mod surface;

pub use circle::CircleClip;
pub use surface::DrawingSurface;

use thiserror::Error;

use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::decode::{self, DecodeError, SourceImage};
use crate::encode::{EncodeError, EncodedImage, OutputFormat};
use crate::geometry::PixelRect;
use crate::OutputShape;

/// Longest output side accepted, the JPEG format limit.
pub const MAX_OUTPUT_SIDE: u32 = 65_535;

/// Largest output area accepted, in pixels.
pub const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Errors that can occur while extracting a crop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The crop rectangle has no area.
    #[error("Crop region is empty: {width}x{height}")]
    EmptyRegion { width: u32, height: u32 },

    /// The crop rectangle exceeds the output size limits.
    #[error("Crop region too large: {width}x{height}")]
    RegionTooLarge { width: u32, height: u32 },

    /// The source image could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The output could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Render the crop into a surface without encoding it.
pub fn extract_surface(
    source: &SourceImage,
    rect: PixelRect,
    shape: OutputShape,
) -> Result<DrawingSurface, ExtractError> {
    if rect.is_empty() {
        return Err(ExtractError::EmptyRegion {
            width: rect.width,
            height: rect.height,
        });
    }
    if exceeds_output_limits(rect) {
        return Err(ExtractError::RegionTooLarge {
            width: rect.width,
            height: rect.height,
        });
    }

    let mut surface = DrawingSurface::new(rect.width, rect.height);
    surface.draw_region(source, rect);

    match shape {
        OutputShape::Rectangle => Ok(surface),
        OutputShape::Circle => {
            if !rect.is_square() {
                log::debug!(
                    "circular crop on non-square {}x{} region, using inscribed circle",
                    rect.width,
                    rect.height
                );
            }
            let mut round = DrawingSurface::new(rect.width, rect.height);
            round.draw_clipped(&surface, &CircleClip::inscribed(rect.width, rect.height));
            Ok(round)
        }
    }
}

fn exceeds_output_limits(rect: PixelRect) -> bool {
    rect.width > MAX_OUTPUT_SIDE
        || rect.height > MAX_OUTPUT_SIDE
        || u64::from(rect.width)
            .checked_mul(u64::from(rect.height))
            .map_or(true, |area| area > MAX_OUTPUT_PIXELS)
}

/// Extract and encode the crop.
///
/// Rectangles are encoded as JPEG at `jpeg_quality`; circles as PNG.
pub fn extract(
    source: &SourceImage,
    rect: PixelRect,
    shape: OutputShape,
    jpeg_quality: u8,
) -> Result<EncodedImage, ExtractError> {
    let surface = extract_surface(source, rect, shape)?;
    let encoded = surface.encode(OutputFormat::for_shape(shape), jpeg_quality)?;
    log::debug!(
        "extracted {:?} crop {:?} -> {} bytes {}",
        shape,
        rect,
        encoded.bytes.len(),
        encoded.mime_type()
    );
    Ok(encoded)
}

/// Decode `bytes` and extract the crop in one step.
///
/// Files over [`DEFAULT_MAX_FILE_SIZE`] are rejected before decoding.
pub fn extract_from_bytes(
    bytes: &[u8],
    rect: PixelRect,
    shape: OutputShape,
    jpeg_quality: u8,
) -> Result<EncodedImage, ExtractError> {
    let source = decode::decode_image_with_limit(bytes, DEFAULT_MAX_FILE_SIZE)?;
    extract(&source, rect, shape, jpeg_quality)
}
