//! URL builders for the tile and coverage endpoints.

use crate::core::bounds::Bounds;
use crate::core::config::ApiConfig;
use crate::core::geo::TileCoord;

/// Tile URL for `coord` in the given layer.
///
/// When `survey` is set (and non-empty) an `until=<survey>` parameter pins the
/// imagery to that capture; otherwise the provider serves its latest capture.
pub fn tile_url(api: &ApiConfig, coord: TileCoord, survey: Option<&str>, layer: &str) -> String {
    let mut url = format!(
        "{}/{}/{}/{}/{}.img?tertiary={}&apikey={}",
        api.tile_base_url.trim_end_matches('/'),
        layer,
        coord.z,
        coord.x,
        coord.y,
        api.tier,
        api.api_key
    );
    if let Some(survey) = survey.filter(|s| !s.is_empty()) {
        url.push_str("&until=");
        url.push_str(survey);
    }
    url
}

/// Coverage query URL for the closed polygon around `bounds`.
pub fn coverage_url(api: &ApiConfig, bounds: &Bounds) -> String {
    let polygon = bounds
        .coverage_ring()
        .iter()
        .map(|(lng, lat)| format!("{},{}", lng, lat))
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "{}/{}?apikey={}&limit={}",
        api.coverage_base_url.trim_end_matches('/'),
        polygon,
        api.api_key,
        api.coverage_limit
    )
}

/// Replaces the `apikey` value so URLs can be logged
pub(crate) fn redact_key(url: &str, api: &ApiConfig) -> String {
    if api.api_key.is_empty() {
        return url.to_string();
    }
    url.replace(&format!("apikey={}", api.api_key), "apikey=***")
}
