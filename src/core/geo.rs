use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Web Mercator projection constants
pub const EARTH_RADIUS: f64 = 6378137.0;
const MAX_LATITUDE: f64 = 85.0511287798;

/// Half the width of the Web Mercator world in meters
pub const HALF_WORLD: f64 = PI * EARTH_RADIUS;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Creates a coordinate from a `(longitude, latitude)` pair
    pub fn from_lng_lat((lng, lat): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857)
    pub fn to_mercator(&self) -> Point {
        let x = self.lng.to_radians() * EARTH_RADIUS;
        let lat = Self::clamp_lat(self.lat);
        let y = ((PI / 4.0 + lat.to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;
        Point::new(x, y)
    }

    /// Creates LatLng from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lng = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }

    /// Formats the coordinate as degrees, minutes and seconds with hemisphere
    /// letters, latitude first: `33° 52′ 07.68″ S 151° 12′ 33.48″ E`.
    pub fn to_hdms(&self, fraction_digits: usize) -> String {
        format!(
            "{} {}",
            degrees_to_hdms(['N', 'S'], self.lat, fraction_digits),
            degrees_to_hdms(['E', 'W'], self.lng, fraction_digits)
        )
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

fn degrees_to_hdms(hemispheres: [char; 2], degrees: f64, fraction_digits: usize) -> String {
    let normalized = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    let total_seconds = (3600.0 * normalized).abs();

    let mut deg = (total_seconds / 3600.0).floor();
    let mut min = ((total_seconds - deg * 3600.0) / 60.0).floor();
    let scale = 10f64.powi(fraction_digits as i32);
    let mut sec = ((total_seconds - deg * 3600.0 - min * 60.0) * scale).round() / scale;

    if sec >= 60.0 {
        sec = 0.0;
        min += 1.0;
    }
    if min >= 60.0 {
        min = 0.0;
        deg += 1.0;
    }

    let mut hdms = format!("{}\u{00b0}", deg as i64);
    if min != 0.0 || sec != 0.0 {
        hdms.push_str(&format!(" {:02}\u{2032}", min as i64));
    }
    if sec != 0.0 {
        let width = if fraction_digits > 0 { fraction_digits + 3 } else { 2 };
        hdms.push_str(&format!(
            " {:0width$.prec$}\u{2033}",
            sec,
            width = width,
            prec = fraction_digits
        ));
    }
    if normalized != 0.0 {
        let hemisphere = if normalized < 0.0 { hemispheres[1] } else { hemispheres[0] };
        hdms.push(' ');
        hdms.push(hemisphere);
    }
    hdms
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a tile coordinate in the slippy map tile system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Creates a tile coordinate from a `[z, x, y]` triple as handed out by
    /// rendering layers
    pub fn from_zxy([z, x, y]: [u32; 3]) -> Self {
        Self::new(x, y, z.min(u8::MAX as u32) as u8)
    }

    /// Creates a tile coordinate from a LatLng and zoom level
    pub fn from_lat_lng(lat_lng: &LatLng, zoom: u8) -> Self {
        let lat_rad = LatLng::clamp_lat(lat_lng.lat).to_radians();
        let n = 2_f64.powi(zoom as i32);

        let max_index = (n - 1.0).max(0.0);
        let x = ((lat_lng.lng + 180.0) / 360.0 * n).floor().clamp(0.0, max_index) as u32;
        let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n)
            .floor()
            .clamp(0.0, max_index) as u32;

        Self::new(x, y, zoom)
    }

    /// Converts tile coordinate to LatLng (northwest corner)
    pub fn to_lat_lng(&self) -> LatLng {
        let n = 2_f64.powi(self.z as i32);
        let lng = self.x as f64 / n * 360.0 - 180.0;
        let lat_rad = (PI * (1.0 - 2.0 * self.y as f64 / n)).sinh().atan();

        LatLng::new(lat_rad.to_degrees(), lng)
    }

    /// Number of tiles along one axis at this zoom
    pub fn tiles_per_axis(&self) -> u32 {
        1u32 << self.z.min(31)
    }

    /// Checks the coordinate addresses an existing tile
    pub fn is_valid(&self) -> bool {
        self.x < self.tiles_per_axis() && self.y < self.tiles_per_axis()
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mercator_round_trip() {
        let sydney = LatLng::new(-33.8688, 151.2093);
        let back = LatLng::from_mercator(sydney.to_mercator());
        assert!((back.lat - sydney.lat).abs() < 1e-9);
        assert!((back.lng - sydney.lng).abs() < 1e-9);
    }

    #[test]
    fn test_hdms_sydney() {
        let sydney = LatLng::new(-33.8688, 151.2093);
        assert_eq!(
            sydney.to_hdms(2),
            "33\u{00b0} 52\u{2032} 07.68\u{2033} S 151\u{00b0} 12\u{2032} 33.48\u{2033} E"
        );
    }

    #[test]
    fn test_hdms_origin_has_no_hemisphere() {
        assert_eq!(LatLng::new(0.0, 0.0).to_hdms(2), "0\u{00b0} 0\u{00b0}");
    }

    #[test]
    fn test_hdms_whole_degrees() {
        assert_eq!(LatLng::new(10.0, -20.5).to_hdms(0), "10\u{00b0} N 20\u{00b0} 30\u{2032} W");
    }

    #[test]
    fn test_tile_from_lat_lng() {
        let tile = TileCoord::from_lat_lng(&LatLng::new(0.0, 0.0), 1);
        assert_eq!(tile, TileCoord::new(1, 1, 1));

        let nw = TileCoord::new(0, 0, 3).to_lat_lng();
        assert_eq!(nw.lng, -180.0);
        assert!(nw.lat > 85.0);
    }

    #[test]
    fn test_tile_from_zxy() {
        let tile = TileCoord::from_zxy([18, 241_234, 157_000]);
        assert_eq!(tile, TileCoord::new(241_234, 157_000, 18));
        assert_eq!(tile.to_string(), "18/241234/157000");
        assert!(tile.is_valid());
        assert!(!TileCoord::new(4, 0, 2).is_valid());
    }
}
