//! Place search against an OpenStreetMap Nominatim endpoint, used to jump the
//! view to a named place.

use crate::core::bounds::Bounds;
use crate::core::constants::USER_AGENT;
use crate::core::geo::LatLng;
use crate::{Result, SurveyError};
use serde::{Deserialize, Serialize};

/// Public Nominatim search endpoint
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    /// Preferred result language
    pub language: String,
    pub limit: usize,
    /// Queries shorter than this return nothing without a request
    pub min_query_length: usize,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_NOMINATIM_URL.to_string(),
            language: "en-AU".to_string(),
            limit: 5,
            min_query_length: 3,
        }
    }
}

/// A search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub location: LatLng,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    display_name: String,
    lat: String,
    lon: String,
    #[serde(default)]
    boundingbox: Option<Vec<String>>,
}

impl NominatimPlace {
    fn into_place(self) -> Result<Place> {
        let name = self.display_name;
        let location = LatLng::new(
            parse_coordinate(&self.lat, &name)?,
            parse_coordinate(&self.lon, &name)?,
        );
        // Nominatim orders the box as [south, north, west, east]
        let bounds = match self.boundingbox.as_deref() {
            Some([south, north, west, east]) => Some(Bounds::new(
                parse_coordinate(north, &name)?,
                parse_coordinate(east, &name)?,
                parse_coordinate(west, &name)?,
                parse_coordinate(south, &name)?,
            )),
            _ => None,
        };

        Ok(Place {
            name,
            location,
            bounds,
        })
    }
}

fn parse_coordinate(value: &str, place: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|_| {
        SurveyError::InvalidCoordinates(format!("{:?} in result {:?}", value, place))
    })
}

/// Parses a Nominatim JSON reply
pub fn parse_places(body: &[u8]) -> Result<Vec<Place>> {
    let raw: Vec<NominatimPlace> = serde_json::from_slice(body)?;
    raw.into_iter().map(NominatimPlace::into_place).collect()
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl Geocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GeocoderConfig {
        &self.config
    }

    /// Places matching `query`, best match first
    pub async fn search(&self, query: &str) -> Result<Vec<Place>> {
        let query = query.trim();
        if query.chars().count() < self.config.min_query_length {
            return Ok(Vec::new());
        }

        let limit = self.config.limit.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("accept-language", self.config.language.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let places = parse_places(&body)?;
        log::debug!("geocoder found {} places for {:?}", places.len(), query);
        Ok(places)
    }
}
