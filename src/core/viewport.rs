use crate::core::bounds::Bounds;
use crate::core::constants::{MAX_ZOOM, MIN_ZOOM, TILE_SIZE};
use crate::core::geo::{LatLng, Point, TileCoord, HALF_WORLD};
use serde::{Deserialize, Serialize};

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport using the default zoom limits
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self::with_zoom_limits(center, zoom, size, MIN_ZOOM, MAX_ZOOM)
    }

    /// Creates a new viewport, clamping `zoom` into `[min_zoom, max_zoom]`
    pub fn with_zoom_limits(
        center: LatLng,
        zoom: f64,
        size: Point,
        min_zoom: f64,
        max_zoom: f64,
    ) -> Self {
        Self {
            center,
            zoom: zoom.clamp(min_zoom, max_zoom),
            size,
            min_zoom,
            max_zoom,
        }
    }

    /// Sets the center of the viewport
    pub fn set_center(&mut self, center: LatLng) {
        self.center = center;
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Meters per pixel at the current zoom
    pub fn resolution(&self) -> f64 {
        2.0 * HALF_WORLD / (TILE_SIZE as f64 * 2_f64.powf(self.zoom))
    }

    /// Visible area in Web Mercator meters as `[min_x, min_y, max_x, max_y]`
    pub fn extent(&self) -> [f64; 4] {
        let center = self.center.to_mercator();
        let resolution = self.resolution();
        let half_width = self.size.x * resolution / 2.0;
        let half_height = self.size.y * resolution / 2.0;

        [
            center.x - half_width,
            center.y - half_height,
            center.x + half_width,
            center.y + half_height,
        ]
    }

    /// Visible area reprojected to longitude/latitude
    pub fn bounds(&self) -> Bounds {
        Bounds::from_mercator_extent(self.extent())
    }

    /// Tiles covering the visible area at the integer zoom level
    ///
    /// A view without a positive, finite size covers nothing.
    pub fn visible_tiles(&self) -> Vec<TileCoord> {
        if !has_area(self.size) {
            return Vec::new();
        }
        let zoom = self.zoom.floor().clamp(0.0, 30.0) as u8;
        let [min_x, min_y, max_x, max_y] = self.extent();
        let tiles_per_axis = 2_f64.powi(zoom as i32);
        let tile_span = 2.0 * HALF_WORLD / tiles_per_axis;
        let last = tiles_per_axis - 1.0;

        let to_column = |x: f64| ((x + HALF_WORLD) / tile_span).floor().clamp(0.0, last) as u32;
        let to_row = |y: f64| ((HALF_WORLD - y) / tile_span).floor().clamp(0.0, last) as u32;

        let (first_col, last_col) = ordered(to_column(min_x), to_column(max_x));
        let (first_row, last_row) = ordered(to_row(max_y), to_row(min_y));

        let width = (last_col - first_col + 1) as usize;
        let height = (last_row - first_row + 1) as usize;
        let mut tiles = Vec::with_capacity(width * height);
        for y in first_row..=last_row {
            for x in first_col..=last_col {
                tiles.push(TileCoord::new(x, y, zoom));
            }
        }
        tiles
    }
}

/// Whether a pixel size spans a real area
pub(crate) fn has_area(size: Point) -> bool {
    size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_is_clamped() {
        let viewport = Viewport::new(LatLng::default(), 40.0, Point::new(256.0, 256.0));
        assert_eq!(viewport.zoom, MAX_ZOOM);

        let mut viewport = Viewport::new(LatLng::default(), 10.0, Point::new(256.0, 256.0));
        viewport.set_zoom(0.0);
        assert_eq!(viewport.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_bounds_surround_center() {
        let center = LatLng::new(-33.8688, 151.2093);
        let viewport = Viewport::new(center, 16.0, Point::new(1024.0, 768.0));
        let bounds = viewport.bounds();

        assert!(bounds.is_valid());
        assert!(bounds.contains(&center));
        assert!(bounds.north - bounds.south < 0.1);
        assert!(bounds.east - bounds.west < 0.1);
    }

    #[test]
    fn test_extent_matches_size() {
        let viewport = Viewport::with_zoom_limits(
            LatLng::default(),
            2.0,
            Point::new(512.0, 256.0),
            0.0,
            22.0,
        );
        let [min_x, min_y, max_x, max_y] = viewport.extent();
        // Four tiles across the world at zoom 2, the view spans two of them
        assert!(((max_x - min_x) - HALF_WORLD).abs() < 1e-6);
        assert!(((max_y - min_y) - HALF_WORLD / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_visible_tiles_cover_view() {
        let viewport = Viewport::with_zoom_limits(
            LatLng::default(),
            1.0,
            Point::new(512.0, 512.0),
            0.0,
            22.0,
        );
        let tiles = viewport.visible_tiles();
        assert_eq!(tiles.len(), 4);
        assert!(tiles.contains(&TileCoord::new(0, 0, 1)));
        assert!(tiles.contains(&TileCoord::new(1, 1, 1)));
    }

    #[test]
    fn test_degenerate_size_has_no_tiles() {
        let center = LatLng::new(-33.8688, 151.2093);
        for size in [
            Point::new(-512.0, 256.0),
            Point::new(256.0, 0.0),
            Point::new(f64::NAN, 256.0),
        ] {
            assert!(Viewport::new(center, 16.0, size).visible_tiles().is_empty());
        }
    }
}
