//! Engine-wide defaults for the survey map: view limits, imagery layer and API endpoints.
//! Keeping them in a single place makes it easier to point the picker at another deployment.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom level used when no explicit zoom is configured.
pub const DEFAULT_ZOOM: f64 = 16.0;

/// Default view center as `(longitude, latitude)` (Sydney CBD).
pub const DEFAULT_CENTER: (f64, f64) = (151.2093, -33.8688);

/// Lowest zoom the view may reach.
pub const MIN_ZOOM: f64 = 3.0;

/// Highest zoom the view may reach.
pub const MAX_ZOOM: f64 = 21.0;

/// Default viewport size in pixels when no surface has reported one yet.
pub const DEFAULT_VIEWPORT_SIZE: (f64, f64) = (1024.0, 768.0);

/// Only tile resources of this orientation are displayed.
pub const DEFAULT_LAYER_TYPE: &str = "Vert";

/// Maximum number of surveys requested from the coverage endpoint.
pub const COVERAGE_LIMIT: u32 = 1000;

/// Fixed tier marker appended to every tile request.
pub const TILE_TIER: &str = "satellite";

/// Base of the tile endpoint; `/{layer}/{z}/{x}/{y}.img` is appended.
pub const DEFAULT_TILE_URL: &str = "https://api.nearmap.com/tiles/v3";

/// Base of the coverage endpoint; `/{polygon}` is appended.
pub const DEFAULT_COVERAGE_URL: &str = "https://api.nearmap.com/coverage/v2/poly";

/// Placeholder key used until a real one is configured.
pub const DEMO_API_KEY: &str = "__demo_api_key__";

/// User agent sent with every outgoing request.
pub const USER_AGENT: &str = "surveymap/0.1.0";
