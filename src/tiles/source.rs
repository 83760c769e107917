use crate::core::config::ApiConfig;
use crate::core::geo::TileCoord;
use crate::core::url::tile_url;
use crate::ui::cell::SurveyCell;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Tiles of one layer type, pinned to whatever survey is currently displayed.
///
/// The survey is read on every call, so a change of the displayed cell is
/// picked up by the next URL without rebuilding the source.
#[derive(Debug, Clone)]
pub struct SurveyTileSource {
    api: ApiConfig,
    layer_type: String,
    displayed: SurveyCell,
}

impl SurveyTileSource {
    pub fn new(api: ApiConfig, layer_type: impl Into<String>, displayed: SurveyCell) -> Self {
        Self {
            api,
            layer_type: layer_type.into(),
            displayed,
        }
    }

    pub fn layer_type(&self) -> &str {
        &self.layer_type
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }
}

impl TileSource for SurveyTileSource {
    fn url(&self, coord: TileCoord) -> String {
        let survey = self.displayed.get();
        tile_url(&self.api, coord, survey.as_deref(), &self.layer_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_follows_displayed_survey() {
        let displayed = SurveyCell::new();
        let source = SurveyTileSource::new(ApiConfig::default(), "Vert", displayed.clone());
        let coord = TileCoord::new(241_234, 157_000, 18);

        let latest = source.url(coord);
        assert!(latest.contains("/Vert/18/241234/157000.img?"));
        assert!(!latest.contains("until="));

        displayed.set(Some("2020-01-10".into()));
        assert!(source.url(coord).ends_with("&until=2020-01-10"));
    }
}
