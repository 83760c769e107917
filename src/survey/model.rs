use serde::{Deserialize, Serialize};

/// One dated capture of aerial imagery as reported by the coverage endpoint.
///
/// Surveys are read-only values: the picker filters and compares them but
/// never builds or edits one itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Capture date, e.g. `2020-01-10`
    #[serde(default)]
    pub capture_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default)]
    pub resources: SurveyResources,
}

impl Survey {
    /// Survey with the given capture date and tile resource types
    pub fn new(capture_date: impl Into<String>, tile_types: &[&str]) -> Self {
        Self {
            capture_date: capture_date.into(),
            resources: SurveyResources {
                tiles: tile_types.iter().map(|t| TileResource::new(*t)).collect(),
            },
            ..Self::default()
        }
    }

    /// Whether any tile resource of this survey has the given type
    pub fn has_tile_type(&self, layer_type: &str) -> bool {
        self.resources.tiles.iter().any(|tile| tile.kind == layer_type)
    }
}

/// Resources attached to a survey
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurveyResources {
    /// Tile resources in provider order; missing or `null` means none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tiles: Vec<TileResource>,
}

/// A tile resource of a survey, one per orientation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TileResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    /// Orientation tag such as `Vert`, `North`, `East`
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl TileResource {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// Body of a coverage reply
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoverageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surveys: Option<Vec<Survey>>,
}

impl CoverageResponse {
    pub fn new(surveys: Vec<Survey>) -> Self {
        Self {
            surveys: Some(surveys),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
