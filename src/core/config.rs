//! Configuration for the survey picker
//!
//! Everything here is read once at startup. Values come from the compiled-in
//! defaults in [`constants`](crate::core::constants), optionally overridden by
//! a JSON file and/or environment variables.

use crate::core::constants::{
    COVERAGE_LIMIT, DEFAULT_CENTER, DEFAULT_COVERAGE_URL, DEFAULT_LAYER_TYPE, DEFAULT_TILE_URL,
    DEFAULT_VIEWPORT_SIZE, DEFAULT_ZOOM, DEMO_API_KEY, MAX_ZOOM, MIN_ZOOM, TILE_TIER,
};
use crate::core::geo::{LatLng, Point};
use crate::core::viewport::{has_area, Viewport};
use crate::geocode::GeocoderConfig;
use crate::{Result, SurveyError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "SURVEYMAP_API_KEY";
/// Environment variable overriding the tile endpoint base
pub const ENV_TILE_URL: &str = "SURVEYMAP_TILE_URL";
/// Environment variable overriding the coverage endpoint base
pub const ENV_COVERAGE_URL: &str = "SURVEYMAP_COVERAGE_URL";

/// Endpoints and credentials of the imagery provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub tile_base_url: String,
    pub coverage_base_url: String,
    pub api_key: String,
    pub coverage_limit: u32,
    pub tier: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            tile_base_url: DEFAULT_TILE_URL.to_string(),
            coverage_base_url: DEFAULT_COVERAGE_URL.to_string(),
            api_key: DEMO_API_KEY.to_string(),
            coverage_limit: COVERAGE_LIMIT,
            tier: TILE_TIER.to_string(),
        }
    }
}

impl ApiConfig {
    /// Points both endpoints at a different host, keeping the usual paths.
    /// Mostly useful for proxies and test servers.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            tile_base_url: format!("{}/tiles/v3", base),
            coverage_base_url: format!("{}/coverage/v2/poly", base),
            ..Self::default()
        }
    }
}

/// Complete picker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub api: ApiConfig,
    /// Tile resource orientation to display, e.g. `Vert`
    pub layer_type: String,
    pub zoom: f64,
    /// `(longitude, latitude)`
    pub center: (f64, f64),
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// `(width, height)` in pixels
    pub viewport_size: (f64, f64),
    /// Place search used to jump to a named place
    pub geocoder: GeocoderConfig,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            layer_type: DEFAULT_LAYER_TYPE.to_string(),
            zoom: DEFAULT_ZOOM,
            center: DEFAULT_CENTER,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            viewport_size: DEFAULT_VIEWPORT_SIZE,
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl PickerConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Loads a (possibly partial) JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides API settings from `SURVEYMAP_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            self.api.api_key = key;
        }
        if let Ok(url) = std::env::var(ENV_TILE_URL) {
            self.api.tile_base_url = url;
        }
        if let Ok(url) = std::env::var(ENV_COVERAGE_URL) {
            self.api.coverage_base_url = url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_zoom > self.max_zoom {
            return Err(SurveyError::Config(format!(
                "min_zoom {} exceeds max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !LatLng::from_lng_lat(self.center).is_valid() {
            return Err(SurveyError::InvalidCoordinates(format!(
                "center {:?} is outside lon/lat range",
                self.center
            )));
        }
        if !has_area(Point::new(self.viewport_size.0, self.viewport_size.1)) {
            return Err(SurveyError::Config(format!(
                "viewport_size {:?} must be positive and finite",
                self.viewport_size
            )));
        }
        if self.layer_type.is_empty() {
            return Err(SurveyError::Config("layer_type must not be empty".into()));
        }
        Ok(())
    }

    /// Initial view: configured zoom and center, clamped to the zoom limits
    pub fn viewport(&self) -> Viewport {
        self.viewport_at(None, None)
    }

    /// View at the given zoom/center, falling back to the configured ones
    pub fn viewport_at(&self, center: Option<LatLng>, zoom: Option<f64>) -> Viewport {
        Viewport::with_zoom_limits(
            center.unwrap_or_else(|| LatLng::from_lng_lat(self.center)),
            zoom.unwrap_or(self.zoom),
            Point::new(self.viewport_size.0, self.viewport_size.1),
            self.min_zoom,
            self.max_zoom,
        )
    }
}
