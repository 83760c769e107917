//! # surveymap
//!
//! Survey-date aware satellite imagery for slippy maps.
//!
//! The provider captures the same area many times. This crate finds out which
//! captures ("surveys") cover the current view, decides which capture date to
//! show when the user's pick has no imagery here, builds tile URLs pinned to
//! that date and loads the tiles.

pub mod core;
pub mod geocode;
pub mod prelude;
pub mod survey;
pub mod tiles;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::{ApiConfig, PickerConfig},
    geo::{LatLng, Point, TileCoord},
    viewport::Viewport,
};

pub use survey::{
    available_surveys, find_closest_date, resolve_survey_date, CoverageResponse, CoverageSource,
    HttpCoverageSource, Survey,
};

pub use tiles::{SurveyTileLayer, SurveyTileSource, TileImage, TileLoader, TileSource};

pub use ui::{MemoryDropdown, PickerBuilder, SurveyCell, SurveyDropdown, SurveyPicker, SurveyUpdate};

pub use geocode::{Geocoder, GeocoderConfig, Place};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Coverage endpoint answered HTTP {status}")]
    CoverageStatus { status: u16 },

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = SurveyError;
