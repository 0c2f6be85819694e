use std::f64::consts::PI;

use crate::geo::GeoPoint;

/// Braille pixels spanned by the whole world at zoom 0.
/// A braille dot is roughly four screen pixels, so a 256px slippy tile
/// shrinks to 64 dots and zoom levels keep their usual meaning.
pub const TILE_PIXELS: f64 = 64.0;

pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 19.0;
const ZOOM_STEP: f64 = 0.5;

/// Web Mercator x in [0, 1)
#[inline(always)]
fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Web Mercator y in [0, 1), 0 at the north edge
#[inline(always)]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

#[inline(always)]
fn inverse_mercator(x: f64, y: f64) -> (f64, f64) {
    let lon = x * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    (lon, lat)
}

/// Viewport representing the visible map area and slippy-map zoom level
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level, same scale as web map tiles
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center: GeoPoint, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon: center.lon,
            center_lat: center.lat,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lon)
    }

    /// World size in pixels at the current zoom
    #[inline(always)]
    fn scale(&self) -> f64 {
        TILE_PIXELS * self.zoom.exp2()
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.scale();
        let x = mercator_x(self.center_lon) + dx as f64 / scale;
        let y = mercator_y(self.center_lat) + dy as f64 / scale;
        let (lon, lat) = inverse_mercator(x.rem_euclid(1.0), y);
        self.center_lon = lon;
        self.center_lat = lat.clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, -ZOOM_STEP);
    }

    /// Change zoom by `delta` levels keeping the point under (px, py) fixed
    fn zoom_at(&mut self, px: i32, py: i32, delta: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);

        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.scale();
        let x = (px as f64 - self.width as f64 / 2.0) / scale + mercator_x(self.center_lon);
        let y = (py as f64 - self.height as f64 / 2.0) / scale + mercator_y(self.center_lat);
        inverse_mercator(x, y)
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let scale = self.scale();
        let px = (mercator_x(lon) - mercator_x(self.center_lon)) * scale + self.width as f64 / 2.0;
        let py = (mercator_y(lat) - mercator_y(self.center_lat)) * scale + self.height as f64 / 2.0;
        (px.round() as i32, py.round() as i32)
    }

    pub fn project_point(&self, point: GeoPoint) -> (i32, i32) {
        self.project(point.lon, point.lat)
    }

    /// Check if a projected point is visible in the viewport
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }

    /// Geographic bounds of the visible area as (min_lon, min_lat, max_lon, max_lat)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (min_lon, max_lat) = self.unproject(0, 0);
        let (max_lon, min_lat) = self.unproject(self.width as i32, self.height as i32);
        (min_lon, min_lat, max_lon, max_lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const CENTER: GeoPoint = GeoPoint::new(7.11935, -73.12274);

    #[test]
    fn test_project_center() {
        let vp = Viewport::new(CENTER, 13.0, 100, 80);
        assert_eq!(vp.project_point(CENTER), (50, 40));
    }

    #[test]
    fn test_unproject_inverts_project() {
        let vp = Viewport::new(CENTER, 13.0, 200, 120);
        let (lon, lat) = vp.unproject(150, 20);
        assert_eq!(vp.project(lon, lat), (150, 20));
    }

    #[test]
    fn test_north_is_up() {
        let vp = Viewport::new(CENTER, 13.0, 100, 100);
        let (_, y_north) = vp.project(CENTER.lon, CENTER.lat + 0.01);
        let (x_east, _) = vp.project(CENTER.lon + 0.01, CENTER.lat);
        assert!(y_north < 50);
        assert!(x_east > 50);
    }

    #[test]
    fn test_pan() {
        let mut vp = Viewport::new(CENTER, 13.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > CENTER.lon);
        vp.pan(0, 10);
        assert!(vp.center_lat < CENTER.lat);
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = Viewport::new(CENTER, 13.0, 100, 100);
        for _ in 0..100 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, MAX_ZOOM);
        for _ in 0..100 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_zoom_at_keeps_point_fixed() {
        let mut vp = Viewport::new(CENTER, 13.0, 200, 200);
        let before = vp.unproject(40, 60);
        vp.zoom_in_at(40, 60);
        let after = vp.project(before.0, before.1);
        assert!((after.0 - 40).abs() <= 1);
        assert!((after.1 - 60).abs() <= 1);
    }

    #[test]
    fn test_bounds_contain_center() {
        let vp = Viewport::new(CENTER, 13.0, 200, 100);
        let (min_lon, min_lat, max_lon, max_lat) = vp.bounds();
        assert!(min_lon < CENTER.lon && CENTER.lon < max_lon);
        assert!(min_lat < CENTER.lat && CENTER.lat < max_lat);
        assert_abs_diff_eq!(vp.center().lat, CENTER.lat, epsilon = 1e-12);
    }
}
