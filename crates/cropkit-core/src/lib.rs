//! Cropkit Core - crop, mask and encode library
//!
//! This crate provides the core functionality behind the Cropkit image
//! cropper: decoding the selected file, extracting a pixel region with an
//! optional circular mask, encoding the result, and the controller state
//! machine that ties user events together.

pub mod config;
pub mod controller;
pub mod data_url;
pub mod decode;
pub mod encode;
pub mod extract;
pub mod geometry;

pub use config::{ConfigError, CropperConfig, ZoomRange};
pub use controller::{
    CropController, CropError, CropEvent, CropOutcome, CropState, Download, ExportError,
    LoadError, LoadTicket,
};
pub use decode::{decode_image, DecodeError, SourceImage};
pub use encode::{EncodedImage, OutputFormat};
pub use extract::{extract, extract_from_bytes, ExtractError};
pub use geometry::{CropPosition, PercentRect, PixelRect};

use serde::{Deserialize, Serialize};

/// Shape of the exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputShape {
    /// Plain rectangle, exported as JPEG
    #[default]
    Rectangle,
    /// Circle inscribed in the crop rectangle, exported as PNG with a
    /// transparent surround
    Circle,
}

/// Aspect ratio constraint (width / height) for the crop widget.
///
/// Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio(1.0);

    /// Returns `None` for zero, negative or non-finite ratios.
    pub fn new(ratio: f64) -> Option<Self> {
        (ratio.is_finite() && ratio > 0.0).then_some(Self(ratio))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for AspectRatio {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("aspect ratio must be positive, got {}", value))
    }
}

impl From<AspectRatio> for f64 {
    fn from(value: AspectRatio) -> Self {
        value.0
    }
}

/// The three aspect/shape buttons offered by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// 1:1 rectangle
    #[default]
    Square,
    /// Unconstrained rectangle
    Free,
    /// 1:1 circle
    Circle,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Square, Preset::Free, Preset::Circle];

    pub fn aspect(self) -> Option<AspectRatio> {
        match self {
            Preset::Square | Preset::Circle => Some(AspectRatio::SQUARE),
            Preset::Free => None,
        }
    }

    pub fn shape(self) -> OutputShape {
        match self {
            Preset::Circle => OutputShape::Circle,
            Preset::Square | Preset::Free => OutputShape::Rectangle,
        }
    }

    /// The preset a given aspect/shape pair corresponds to, if any.
    ///
    /// Any circle counts as the circle preset regardless of aspect.
    pub fn matching(aspect: Option<AspectRatio>, shape: OutputShape) -> Option<Preset> {
        match (shape, aspect) {
            (OutputShape::Circle, _) => Some(Preset::Circle),
            (OutputShape::Rectangle, None) => Some(Preset::Free),
            (OutputShape::Rectangle, Some(a)) if a == AspectRatio::SQUARE => Some(Preset::Square),
            (OutputShape::Rectangle, Some(_)) => None,
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "square" => Ok(Preset::Square),
            "free" => Ok(Preset::Free),
            "circle" | "round" => Ok(Preset::Circle),
            other => Err(format!("unknown preset: {}", other)),
        }
    }
}
