//! Crop controller: the state machine behind the cropper page.
//!
//! All mutable UI state lives in one [`CropState`] owned by a
//! [`CropController`]. Every change goes through a named method (or the
//! equivalent [`CropEvent`] passed to [`CropController::apply`]).
//!
//! # Loading
//!
//! Reading the selected file is asynchronous on the page, so loading is a
//! request/result pair:
//!
//! 1. [`CropController::begin_load`] marks a load as pending and hands out a
//!    [`LoadTicket`]
//! 2. [`CropController::finish_load`] (or [`CropController::fail_load`])
//!    delivers the outcome for that ticket
//!
//! Selecting another file before the first one finishes supersedes it; the
//! late result is rejected as stale.
//!
//! # Invariants
//!
//! - A crop area is only stored while a source image is loaded
//! - Zoom always lies inside the configured range
//! - Output shape is set explicitly by the aspect/preset handlers

use thiserror::Error;

use crate::config::{ConfigError, CropperConfig};
use crate::decode::{self, DecodeError, SourceImage};
use crate::extract::{self, ExtractError};
use crate::geometry::{CropPosition, PercentRect, PixelRect};
use crate::{data_url, AspectRatio, OutputShape, Preset};

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u32);

impl LoadTicket {
    pub fn id(self) -> u32 {
        self.0
    }

    /// Rebuild a ticket from an id handed across the JavaScript boundary.
    pub fn from_id(id: u32) -> Self {
        Self(id)
    }
}

/// Errors reported when delivering a load result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The ticket does not belong to the load currently pending.
    #[error("Load request {0} is no longer current")]
    Stale(u32),

    /// The file could not be decoded as an image.
    #[error("Could not load image: {0}")]
    Decode(#[from] DecodeError),

    /// The page could not read the file.
    #[error("Could not read file: {0}")]
    Read(String),
}

/// Errors reported by an export.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Failed to crop image: {0}")]
    Extract(#[from] ExtractError),
}

/// Either kind of failure, for [`CropController::apply`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CropError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// A finished export, ready for the page to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime_type: String,
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

/// User and page events the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum CropEvent {
    FileSelected,
    ImageLoaded { ticket: LoadTicket, bytes: Vec<u8> },
    ImageFailed { ticket: LoadTicket, reason: String },
    CropRegionChanged { percent: PercentRect, pixels: PixelRect },
    CropPositionChanged(CropPosition),
    ZoomChanged(f64),
    AspectChanged { aspect: Option<AspectRatio>, shape: OutputShape },
    PresetSelected(Preset),
    ExportRequested,
}

/// What [`CropController::apply`] did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum CropOutcome {
    /// State changed.
    Updated,
    /// A load is now pending under this ticket.
    LoadStarted(LoadTicket),
    /// The event was not applicable in the current state.
    Ignored,
    /// An export finished.
    Exported(Download),
}

/// Everything the cropper page displays.
#[derive(Debug, Clone, PartialEq)]
pub struct CropState {
    /// The loaded image, if any.
    pub source: Option<SourceImage>,
    /// Load currently in flight.
    pub pending: Option<LoadTicket>,
    /// Why the most recent load failed.
    pub last_error: Option<LoadError>,
    /// Widget pan offset.
    pub position: CropPosition,
    pub zoom: f64,
    /// Latest crop area in source pixels.
    pub crop_area: Option<PixelRect>,
    /// Latest crop area as percentages.
    pub crop_area_percent: Option<PercentRect>,
    pub aspect: Option<AspectRatio>,
    pub shape: OutputShape,
}

impl CropState {
    fn initial(config: &CropperConfig) -> Self {
        Self {
            source: None,
            pending: None,
            last_error: None,
            position: CropPosition::ORIGIN,
            zoom: config.zoom.clamp(1.0),
            crop_area: None,
            crop_area_percent: None,
            aspect: config.initial_preset.aspect(),
            shape: config.initial_preset.shape(),
        }
    }

    fn clear_crop_area(&mut self) {
        self.crop_area = None;
        self.crop_area_percent = None;
    }
}

/// Owns the cropper state and applies events to it.
#[derive(Debug, Clone)]
pub struct CropController {
    config: CropperConfig,
    state: CropState,
    next_ticket: u32,
}

impl Default for CropController {
    fn default() -> Self {
        let config = CropperConfig::default();
        Self {
            state: CropState::initial(&config),
            config,
            next_ticket: 1,
        }
    }
}

impl CropController {
    /// Create a controller after validating `config`.
    pub fn new(config: CropperConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: CropState::initial(&config),
            config,
            next_ticket: 1,
        })
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.state.source.as_ref()
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn position(&self) -> CropPosition {
        self.state.position
    }

    pub fn aspect(&self) -> Option<AspectRatio> {
        self.state.aspect
    }

    pub fn shape(&self) -> OutputShape {
        self.state.shape
    }

    /// The preset button that matches the current aspect and shape.
    pub fn preset(&self) -> Option<Preset> {
        Preset::matching(self.state.aspect, self.state.shape)
    }

    pub fn crop_area(&self) -> Option<PixelRect> {
        self.state.crop_area
    }

    pub fn crop_area_percent(&self) -> Option<PercentRect> {
        self.state.crop_area_percent
    }

    pub fn is_pending(&self) -> bool {
        self.state.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.state.last_error.as_ref()
    }

    /// Whether an export would do anything.
    pub fn can_export(&self) -> bool {
        self.state.source.is_some() && self.state.crop_area.is_some()
    }

    /// Start loading a newly selected file.
    ///
    /// Any load still pending is superseded.
    pub fn begin_load(&mut self) -> LoadTicket {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        if let Some(previous) = self.state.pending.replace(ticket) {
            log::debug!("load {} superseded by {}", previous.id(), ticket.id());
        }
        ticket
    }

    /// Deliver the bytes read for `ticket`.
    ///
    /// On success the image becomes the source, zoom and position are reset
    /// and any stored crop area is cleared. On decode failure no image is
    /// shown and the error is kept in [`CropState::last_error`].
    pub fn finish_load(&mut self, ticket: LoadTicket, bytes: &[u8]) -> Result<(), LoadError> {
        self.check_ticket(ticket)?;
        let decoded = decode::decode_image_with_limit(bytes, self.config.max_file_size);
        self.complete_load(decoded.map_err(LoadError::from))
    }

    /// Deliver a `FileReader` data URL for `ticket`.
    pub fn finish_load_data_url(&mut self, ticket: LoadTicket, url: &str) -> Result<(), LoadError> {
        self.check_ticket(ticket)?;
        let decoded = data_url::decode(url)
            .and_then(|(_, bytes)| decode::decode_image_with_limit(&bytes, self.config.max_file_size));
        self.complete_load(decoded.map_err(LoadError::from))
    }

    /// Report that the page could not read the file for `ticket`.
    pub fn fail_load(&mut self, ticket: LoadTicket, reason: &str) -> Result<(), LoadError> {
        self.check_ticket(ticket)?;
        self.complete_load(Err(LoadError::Read(reason.to_string())))
    }

    fn check_ticket(&self, ticket: LoadTicket) -> Result<(), LoadError> {
        if self.state.pending == Some(ticket) {
            Ok(())
        } else {
            log::warn!("ignoring result of stale load {}", ticket.id());
            Err(LoadError::Stale(ticket.id()))
        }
    }

    fn complete_load(&mut self, result: Result<SourceImage, LoadError>) -> Result<(), LoadError> {
        self.state.pending = None;
        self.state.clear_crop_area();

        match result {
            Ok(image) => {
                log::info!("loaded {}x{} image", image.width, image.height);
                self.state.source = Some(image);
                self.state.last_error = None;
                self.state.zoom = self.config.zoom.clamp(1.0);
                self.state.position = CropPosition::ORIGIN;
                Ok(())
            }
            Err(err) => {
                log::warn!("image load failed: {}", err);
                self.state.source = None;
                self.state.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Set the aspect constraint and output shape.
    ///
    /// The stored crop area is left alone; the widget reports a new one once
    /// the user interacts again.
    pub fn set_aspect(&mut self, aspect: Option<AspectRatio>, shape: OutputShape) {
        log::debug!("aspect {:?}, shape {:?}", aspect, shape);
        self.state.aspect = aspect;
        self.state.shape = shape;
    }

    pub fn select_preset(&mut self, preset: Preset) {
        self.set_aspect(preset.aspect(), preset.shape());
    }

    /// Store the latest crop area reported by the widget.
    ///
    /// Returns `false` (and stores nothing) when no image is loaded.
    pub fn on_crop_region_changed(&mut self, percent: PercentRect, pixels: PixelRect) -> bool {
        if self.state.source.is_none() {
            log::warn!("crop region {:?} reported without a loaded image", pixels);
            return false;
        }
        self.state.crop_area = Some(pixels);
        self.state.crop_area_percent = Some(percent);
        true
    }

    /// Store a crop area reported only as percentages, deriving the pixel
    /// rect from the loaded image's size.
    pub fn on_crop_percent_changed(&mut self, percent: PercentRect) -> bool {
        let Some(pixels) = self
            .state
            .source
            .as_ref()
            .map(|source| percent.to_pixels(source.width, source.height))
        else {
            log::warn!("percent crop region {:?} reported without a loaded image", percent);
            return false;
        };
        self.on_crop_region_changed(percent, pixels)
    }

    pub fn set_crop_position(&mut self, position: CropPosition) {
        self.state.position = position;
    }

    /// Set zoom, clamped into the configured range. Returns the stored value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.state.zoom = self.config.zoom.clamp(zoom);
        self.state.zoom
    }

    /// Crop the loaded image with the current settings.
    ///
    /// Returns `Ok(None)` without doing anything unless an image is loaded
    /// and a crop area has been reported.
    pub fn export_crop(&self) -> Result<Option<Download>, ExportError> {
        let (Some(source), Some(rect)) = (self.state.source.as_ref(), self.state.crop_area) else {
            log::debug!("export requested before image and crop area are ready");
            return Ok(None);
        };

        let shape = self.state.shape;
        let encoded = extract::extract(source, rect, shape, self.config.jpeg_quality)?;
        let filename = self.config.filename_for(shape).to_string();
        log::info!(
            "exported {}x{} {} ({} bytes)",
            encoded.width,
            encoded.height,
            filename,
            encoded.bytes.len()
        );

        Ok(Some(Download {
            filename,
            mime_type: encoded.mime_type().to_string(),
            data_url: encoded.to_data_url(),
            width: encoded.width,
            height: encoded.height,
        }))
    }

    /// Apply one event.
    pub fn apply(&mut self, event: CropEvent) -> Result<CropOutcome, CropError> {
        match event {
            CropEvent::FileSelected => Ok(CropOutcome::LoadStarted(self.begin_load())),
            CropEvent::ImageLoaded { ticket, bytes } => {
                self.finish_load(ticket, &bytes)?;
                Ok(CropOutcome::Updated)
            }
            CropEvent::ImageFailed { ticket, reason } => {
                self.fail_load(ticket, &reason)?;
                Ok(CropOutcome::Updated)
            }
            CropEvent::CropRegionChanged { percent, pixels } => {
                if self.on_crop_region_changed(percent, pixels) {
                    Ok(CropOutcome::Updated)
                } else {
                    Ok(CropOutcome::Ignored)
                }
            }
            CropEvent::CropPositionChanged(position) => {
                self.set_crop_position(position);
                Ok(CropOutcome::Updated)
            }
            CropEvent::ZoomChanged(zoom) => {
                self.set_zoom(zoom);
                Ok(CropOutcome::Updated)
            }
            CropEvent::AspectChanged { aspect, shape } => {
                self.set_aspect(aspect, shape);
                Ok(CropOutcome::Updated)
            }
            CropEvent::PresetSelected(preset) => {
                self.select_preset(preset);
                Ok(CropOutcome::Updated)
            }
            CropEvent::ExportRequested => Ok(self
                .export_crop()?
                .map_or(CropOutcome::Ignored, CropOutcome::Exported)),
        }
    }
}
