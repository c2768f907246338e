//! Output encoding for Cropkit.
//!
//! Exports use one of two formats:
//! - JPEG (lossy, default quality 90) for rectangular crops
//! - PNG (lossless, alpha preserved) for circular crops
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::encode::encode_jpeg;
//!
//! let pixels = vec![128u8; 100 * 100 * 3]; // Gray image
//! let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();
//! println!("Encoded {} bytes", jpeg_bytes.len());
//! ```

mod jpeg;
mod png;

pub use jpeg::{encode_jpeg, encode_jpeg_rgba};
pub use png::encode_png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{data_url, OutputShape};

/// Errors that can occur during encoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

pub(crate) fn validate_buffer(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: usize,
) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * channels;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encoded output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Circles need transparency, so they are always PNG.
    pub fn for_shape(shape: OutputShape) -> Self {
        match shape {
            OutputShape::Rectangle => OutputFormat::Jpeg,
            OutputShape::Circle => OutputFormat::Png,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// An encoded image ready to be handed to the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// `data:<mime>;base64,...` form, usable directly as a link target.
    pub fn to_data_url(&self) -> String {
        data_url::encode(self.mime_type(), &self.bytes)
    }
}
