//! Surveys: the coverage reply model, coverage lookup and date resolution.

pub mod coverage;
pub mod model;
pub mod resolver;

pub use coverage::{available_surveys, CoverageSource, HttpCoverageSource};
pub use model::{CoverageResponse, Survey, SurveyResources, TileResource};
pub use resolver::{find_closest_date, parse_capture_date, resolve_survey_date};
