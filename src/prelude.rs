//! Prelude module for common surveymap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use surveymap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{ApiConfig, PickerConfig},
    geo::{LatLng, Point, TileCoord},
    url::{coverage_url, tile_url},
    viewport::Viewport,
};

pub use crate::survey::{
    available_surveys, find_closest_date, parse_capture_date, resolve_survey_date,
    CoverageResponse, CoverageSource, HttpCoverageSource, Survey, TileResource,
};

pub use crate::tiles::{
    SurveyTileLayer, SurveyTileSource, TileImage, TileLoader, TileResult, TileSource,
};

pub use crate::ui::{
    MemoryDropdown, PickerBuilder, SurveyCell, SurveyDropdown, SurveyPicker, SurveyUpdate,
};

pub use crate::geocode::{Geocoder, GeocoderConfig, Place};

pub use crate::{Error as SurveyError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
