//! Fluent construction of a [`SurveyPicker`]
//!
//! Observers for the selected/displayed cells, the dropdown and the coverage
//! source are all handed in here, so the picker itself never reaches for a
//! global.

use crate::core::config::PickerConfig;
use crate::core::geo::LatLng;
use crate::core::viewport::Viewport;
use crate::survey::{CoverageSource, HttpCoverageSource};
use crate::tiles::{SurveyTileLayer, SurveyTileSource, TileLoader};
use crate::ui::cell::SurveyCell;
use crate::ui::dropdown::{MemoryDropdown, SurveyDropdown};
use crate::ui::picker::SurveyPicker;
use crate::Result;
use std::sync::Arc;

/// Builder for creating and configuring [`SurveyPicker`] instances
pub struct PickerBuilder {
    config: PickerConfig,
    coverage: Option<Arc<dyn CoverageSource>>,
    dropdown: Option<Box<dyn SurveyDropdown>>,
    tile_loader: Option<TileLoader>,
    selected: SurveyCell,
    displayed: SurveyCell,
    center: Option<LatLng>,
    zoom: Option<f64>,
}

impl PickerBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::with_config(PickerConfig::default())
    }

    /// Start from an explicit configuration
    pub fn with_config(config: PickerConfig) -> Self {
        Self {
            config,
            coverage: None,
            dropdown: None,
            tile_loader: None,
            selected: SurveyCell::new(),
            displayed: SurveyCell::new(),
            center: None,
            zoom: None,
        }
    }

    /// Set the coverage source; defaults to the HTTP endpoint from the config
    pub fn coverage(mut self, coverage: Arc<dyn CoverageSource>) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Set the dropdown to keep in sync; defaults to a [`MemoryDropdown`]
    pub fn dropdown(mut self, dropdown: Box<dyn SurveyDropdown>) -> Self {
        self.dropdown = Some(dropdown);
        self
    }

    /// Use a specific tile loader
    pub fn tile_loader(mut self, loader: TileLoader) -> Self {
        self.tile_loader = Some(loader);
        self
    }

    /// Called whenever the selected survey changes
    pub fn on_selected<F>(self, observer: F) -> Self
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.selected.subscribe(observer);
        self
    }

    /// Called whenever the displayed survey changes
    pub fn on_displayed<F>(self, observer: F) -> Self
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.displayed.subscribe(observer);
        self
    }

    /// Initial center; defaults to the configured one
    pub fn center(mut self, center: LatLng) -> Self {
        self.center = Some(center);
        self
    }

    /// Initial zoom; defaults to the configured one
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn build(self) -> Result<SurveyPicker> {
        self.config.validate()?;

        let coverage = match self.coverage {
            Some(coverage) => coverage,
            None => Arc::new(HttpCoverageSource::new(self.config.api.clone())?),
        };
        let loader = match self.tile_loader {
            Some(loader) => loader,
            None => TileLoader::new()?,
        };
        let dropdown = self
            .dropdown
            .unwrap_or_else(|| Box::new(MemoryDropdown::new()));

        let source = SurveyTileSource::new(
            self.config.api.clone(),
            self.config.layer_type.clone(),
            self.displayed.clone(),
        );
        let tile_layer = Arc::new(SurveyTileLayer::new(source, loader));
        let viewport: Viewport = self.config.viewport_at(self.center, self.zoom);

        Ok(SurveyPicker::from_parts(
            self.config,
            coverage,
            dropdown,
            self.selected,
            self.displayed,
            tile_layer,
            viewport,
        ))
    }
}

impl Default for PickerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
