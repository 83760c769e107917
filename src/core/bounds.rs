use crate::core::geo::{LatLng, Point};
use geo_types::{LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Geographic rectangle covered by the current view, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub east: f64,
    pub west: f64,
    pub south: f64,
}

impl Bounds {
    /// Creates bounds from individual edges
    pub fn new(north: f64, east: f64, west: f64, south: f64) -> Self {
        Self {
            north,
            east,
            west,
            south,
        }
    }

    /// Creates bounds from a Web Mercator extent `[min_x, min_y, max_x, max_y]`
    /// in meters, reprojecting both corners to longitude/latitude.
    pub fn from_mercator_extent(extent: [f64; 4]) -> Self {
        let south_west = LatLng::from_mercator(Point::new(extent[0], extent[1]));
        let north_east = LatLng::from_mercator(Point::new(extent[2], extent[3]));
        Self::new(north_east.lat, north_east.lng, south_west.lng, south_west.lat)
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }

    /// Checks if the bounds are valid (south <= north, west <= east)
    pub fn is_valid(&self) -> bool {
        self.south <= self.north && self.west <= self.east
    }

    /// Closed ring of `(lng, lat)` corners in the order the coverage endpoint
    /// expects: north-west, north-east, south-east, south-west, north-west.
    pub fn coverage_ring(&self) -> [(f64, f64); 5] {
        [
            (self.west, self.north),
            (self.east, self.north),
            (self.east, self.south),
            (self.west, self.south),
            (self.west, self.north),
        ]
    }

    /// The view rectangle as a polygon with `x = longitude`, `y = latitude`.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.coverage_ring().to_vec()), vec![])
    }
}
