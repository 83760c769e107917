//! The survey picker: application state tying coverage, date resolution,
//! the date dropdown and the tile layer together.
//!
//! Flow: the view settles → [`SurveyPicker::on_move_end`] → coverage lookup →
//! the displayed date is resolved against the user's selection → the dropdown
//! is rebuilt. Picking a date in the dropdown → [`SurveyPicker::on_select`] →
//! both cells are updated and the tile layer reloads.

use crate::core::bounds::Bounds;
use crate::core::config::PickerConfig;
use crate::core::viewport::Viewport;
use crate::survey::{available_surveys, resolve_survey_date, CoverageSource, Survey};
use crate::tiles::SurveyTileLayer;
use crate::ui::cell::SurveyCell;
use crate::ui::dropdown::SurveyDropdown;
use crate::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Outcome of a coverage refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyUpdate {
    /// The response was applied to the picker
    Applied {
        /// Surveys with imagery of the configured layer type
        available: usize,
        /// Date now on screen
        displayed: Option<String>,
    },
    /// A newer refresh started while this one was in flight; its result was dropped
    Superseded,
}

struct PickerState {
    viewport: Viewport,
    available: Vec<Survey>,
}

/// Survey picker application context
pub struct SurveyPicker {
    config: PickerConfig,
    coverage: Arc<dyn CoverageSource>,
    selected: SurveyCell,
    displayed: SurveyCell,
    state: Mutex<PickerState>,
    dropdown: Mutex<Box<dyn SurveyDropdown>>,
    tile_layer: Arc<SurveyTileLayer>,
    /// Bumped by every coverage refresh; responses of older refreshes are dropped
    generation: AtomicU64,
}

impl SurveyPicker {
    /// Picker over the HTTP coverage endpoint with an in-memory dropdown.
    /// Use [`PickerBuilder`](crate::ui::PickerBuilder) to plug in anything else.
    pub fn new(config: PickerConfig) -> Result<Self> {
        crate::ui::builder::PickerBuilder::with_config(config).build()
    }

    pub(crate) fn from_parts(
        config: PickerConfig,
        coverage: Arc<dyn CoverageSource>,
        dropdown: Box<dyn SurveyDropdown>,
        selected: SurveyCell,
        displayed: SurveyCell,
        tile_layer: Arc<SurveyTileLayer>,
        viewport: Viewport,
    ) -> Self {
        Self {
            config,
            coverage,
            selected,
            displayed,
            state: Mutex::new(PickerState {
                viewport,
                available: Vec::new(),
            }),
            dropdown: Mutex::new(dropdown),
            tile_layer,
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, PickerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// The user's explicit choice
    pub fn selected_cell(&self) -> &SurveyCell {
        &self.selected
    }

    /// The date actually on screen
    pub fn displayed_cell(&self) -> &SurveyCell {
        &self.displayed
    }

    pub fn selected_survey(&self) -> Option<String> {
        self.selected.get()
    }

    pub fn displayed_survey(&self) -> Option<String> {
        self.displayed.get()
    }

    /// Surveys found by the last applied coverage refresh
    pub fn available_surveys(&self) -> Vec<Survey> {
        self.state().available.clone()
    }

    pub fn tile_layer(&self) -> &Arc<SurveyTileLayer> {
        &self.tile_layer
    }

    pub fn viewport(&self) -> Viewport {
        self.state().viewport.clone()
    }

    /// Replaces the view without querying coverage
    pub fn set_viewport(&self, viewport: Viewport) {
        self.state().viewport = viewport;
    }

    /// Geographic bounds of the current view
    pub fn bounds(&self) -> Bounds {
        self.state().viewport.bounds()
    }

    /// Query coverage for the current view, resolve the displayed date and
    /// rebuild the dropdown.
    ///
    /// On failure the picker is left as it was and the error is returned. If
    /// another refresh starts before this one's response arrives, the response
    /// (or error) is discarded and [`SurveyUpdate::Superseded`] is returned.
    pub async fn update_surveys(&self) -> Result<SurveyUpdate> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let bounds = self.bounds();

        let fetched = self.coverage.fetch_coverage(&bounds).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            log::debug!("coverage refresh {} superseded, dropping its result", generation);
            return Ok(SurveyUpdate::Superseded);
        }

        let response = fetched.map_err(|e| {
            log::error!("coverage lookup failed: {}", e);
            e
        })?;

        let available = available_surveys(Some(&response), &self.config.layer_type);
        let selected = self.selected.get();
        let displayed = resolve_survey_date(&available, selected.as_deref());
        let count = available.len();
        self.state().available = available;

        let changed = self.displayed.get() != displayed;
        self.displayed.set(displayed.clone());
        self.update_dropdown();
        if changed {
            self.refresh_tiles();
        }

        log::info!(
            "{} surveys with {} imagery, displaying {:?}",
            count,
            self.config.layer_type,
            displayed
        );
        Ok(SurveyUpdate::Applied {
            available: count,
            displayed,
        })
    }

    /// Rebuild the dropdown from the available surveys and select the
    /// displayed date
    pub fn update_dropdown(&self) {
        let dates: Vec<String> = self
            .state()
            .available
            .iter()
            .map(|s| s.capture_date.clone())
            .collect();
        let displayed = self.displayed.get();

        let mut dropdown = self.dropdown.lock().unwrap_or_else(PoisonError::into_inner);
        dropdown.clear();
        for date in &dates {
            dropdown.add_option(date, date);
        }
        dropdown.set_value(displayed.as_deref());
    }

    /// The view settled after a pan or zoom
    pub async fn on_move_end(&self, viewport: Viewport) -> Result<SurveyUpdate> {
        self.set_viewport(viewport);
        self.update_surveys().await
    }

    /// The user picked `date` in the dropdown.
    ///
    /// The choice becomes the selection. It is displayed as-is when it is
    /// available here (or nothing has been fetched yet), otherwise the closest
    /// available date is shown. The tile layer reloads either way.
    pub fn on_select(&self, date: &str) -> Option<String> {
        let date = Some(date.to_string()).filter(|d| !d.is_empty());
        let displayed = {
            let state = self.state();
            if state.available.is_empty() {
                date.clone()
            } else {
                resolve_survey_date(&state.available, date.as_deref())
            }
        };

        self.selected.set(date);
        self.displayed.set(displayed.clone());
        self.update_dropdown();
        self.refresh_tiles();
        displayed
    }

    /// Make the tile layer drop its tiles and load them again for the
    /// displayed survey
    pub fn refresh_tiles(&self) {
        self.tile_layer.refresh();
    }

    /// Request every tile visible in the current view. Returns how many were queued.
    pub fn request_visible_tiles(&self) -> usize {
        let tiles = self.state().viewport.visible_tiles();
        self.tile_layer.request_tiles(&tiles)
    }
}

impl std::fmt::Debug for SurveyPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveyPicker")
            .field("selected", &self.selected.get())
            .field("displayed", &self.displayed.get())
            .field("available", &self.state().available.len())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
