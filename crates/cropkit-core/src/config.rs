//! Cropper configuration.
//!
//! Every field has a default, so the page can pass a partial object (or
//! nothing at all) and still get a working cropper.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{OutputShape, Preset};

/// JPEG quality used for rectangular exports (canvas quality 0.9).
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Largest file accepted for loading, in bytes.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Configuration validation errors.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("Invalid zoom range: min {min}, max {max}, step {step}")]
    InvalidZoomRange { min: f64, max: f64, step: f64 },

    #[error("Export filename for {0:?} output is empty")]
    EmptyFilename(OutputShape),

    #[error("Maximum file size must be non-zero")]
    ZeroMaxFileSize,
}

/// Bounds and step of the zoom slider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 3.0,
            step: 0.1,
        }
    }
}

impl ZoomRange {
    /// Clamp `zoom` into the range. Non-finite input falls back to `min`.
    pub fn clamp(&self, zoom: f64) -> f64 {
        if zoom.is_finite() {
            zoom.clamp(self.min, self.max)
        } else {
            self.min
        }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.step.is_finite()
            && self.min > 0.0
            && self.step > 0.0
            && self.min <= self.max
    }
}

/// Cropper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// JPEG quality (1-100) for rectangular exports.
    pub jpeg_quality: u8,
    /// Zoom slider bounds.
    pub zoom: ZoomRange,
    /// Download name for rectangular exports.
    pub rect_filename: String,
    /// Download name for circular exports.
    pub round_filename: String,
    /// Largest file accepted for loading, in bytes.
    pub max_file_size: u64,
    /// Preset active when the cropper starts.
    pub initial_preset: Preset,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            zoom: ZoomRange::default(),
            rect_filename: "cropped-image.jpeg".to_string(),
            round_filename: "cropped-image-round.png".to_string(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            initial_preset: Preset::Square,
        }
    }
}

impl CropperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the configuration for values the cropper cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }
        if !self.zoom.is_valid() {
            return Err(ConfigError::InvalidZoomRange {
                min: self.zoom.min,
                max: self.zoom.max,
                step: self.zoom.step,
            });
        }
        if self.rect_filename.trim().is_empty() {
            return Err(ConfigError::EmptyFilename(OutputShape::Rectangle));
        }
        if self.round_filename.trim().is_empty() {
            return Err(ConfigError::EmptyFilename(OutputShape::Circle));
        }
        if self.max_file_size == 0 {
            return Err(ConfigError::ZeroMaxFileSize);
        }
        Ok(())
    }

    /// Download name for an export of the given shape.
    pub fn filename_for(&self, shape: OutputShape) -> &str {
        match shape {
            OutputShape::Rectangle => &self.rect_filename,
            OutputShape::Circle => &self.round_filename,
        }
    }
}
