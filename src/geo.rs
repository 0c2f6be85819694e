use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kilometers to degrees, flat approximation.
/// Only accurate near the reference latitude (~7.1°N); not geodesic.
pub const KM_TO_DEG: f64 = 0.009;

/// Number of vertices in a hexagon
pub const HEXAGON_SIDES: usize = 6;

/// (3√3)/2, the area of a regular hexagon with unit circumradius
const HEX_AREA_FACTOR: f64 = 2.598_076_211_353_316;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum GeometryError {
    #[error("hexagon area must be a positive finite number of km², got {0}")]
    NonPositiveArea(f64),
}

/// A geographic coordinate in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Degree-space offset from `other` as (dlat, dlon)
    #[inline(always)]
    fn offset_from(&self, other: &GeoPoint) -> DVec2 {
        DVec2::new(self.lat - other.lat, self.lon - other.lon)
    }

    /// Flat degree-space distance to `other`, scaled to km with `KM_TO_DEG`
    pub fn flat_distance_km(&self, other: &GeoPoint) -> f64 {
        self.offset_from(other).length() / KM_TO_DEG
    }
}

pub type Hexagon = [GeoPoint; HEXAGON_SIDES];

/// Circumradius (km) of the regular hexagon with the given area.
/// Inverts `A = (3√3/2) r²`.
pub fn circumradius_km(area_km2: f64) -> Result<f64, GeometryError> {
    if !area_km2.is_finite() || area_km2 <= 0.0 {
        return Err(GeometryError::NonPositiveArea(area_km2));
    }
    Ok((area_km2 / HEX_AREA_FACTOR).sqrt())
}

/// Area (km²) of the regular hexagon with circumradius `radius_km`
#[inline]
pub fn hexagon_area_km2(radius_km: f64) -> f64 {
    HEX_AREA_FACTOR * radius_km * radius_km
}

/// Vertices of a regular hexagon of `area_km2` centered on `center`.
/// Vertex `i` sits at 60°·i: latitude gets the cosine, longitude the sine,
/// so vertex 0 is due north of the center.
pub fn hexagon_vertices(center: GeoPoint, area_km2: f64) -> Result<Hexagon, GeometryError> {
    let radius_deg = circumradius_km(area_km2)? * KM_TO_DEG;

    let mut vertices = [center; HEXAGON_SIDES];
    for (i, vertex) in vertices.iter_mut().enumerate() {
        let angle = (60.0 * i as f64).to_radians();
        // from_angle gives (cos, sin) = (dlat, dlon)
        let offset = DVec2::from_angle(angle) * radius_deg;
        *vertex = GeoPoint::new(center.lat + offset.x, center.lon + offset.y);
    }
    Ok(vertices)
}

/// Even-odd point in polygon test in degree space
pub fn polygon_contains(vertices: &[GeoPoint], point: GeoPoint) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (a, b) = (vertices[i], vertices[j]);
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let cross_lon = a.lon + (point.lat - a.lat) / (b.lat - a.lat) * (b.lon - a.lon);
            if point.lon < cross_lon {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const CENTER: GeoPoint = GeoPoint::new(7.11935, -73.12274);

    #[test]
    fn test_six_vertices_equidistant() {
        for area in [0.01, 1.5, 8.58, 21.55, 500.0] {
            let hex = hexagon_vertices(CENTER, area).unwrap();
            let radius = circumradius_km(area).unwrap();
            assert_eq!(hex.len(), 6);
            for v in &hex {
                assert_abs_diff_eq!(v.flat_distance_km(&CENTER), radius, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_area_round_trip() {
        for area in [0.5, 1.98, 15.03, 165.0] {
            let r = circumradius_km(area).unwrap();
            assert_abs_diff_eq!(hexagon_area_km2(r), area, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_solar_radius_and_first_vertex() {
        let r = circumradius_km(8.58).unwrap();
        assert_abs_diff_eq!(r, 1.819, epsilon = 1e-3);

        let hex = hexagon_vertices(CENTER, 8.58).unwrap();
        assert_abs_diff_eq!(hex[0].lat, CENTER.lat + r * KM_TO_DEG, epsilon = 1e-12);
        assert_abs_diff_eq!(hex[0].lon, CENTER.lon, epsilon = 1e-12);
    }

    #[test]
    fn test_third_vertex_is_south_east() {
        // 120°: cos < 0, sin > 0
        let hex = hexagon_vertices(CENTER, 8.58).unwrap();
        assert!(hex[2].lat < CENTER.lat);
        assert!(hex[2].lon > CENTER.lon);
        assert_abs_diff_eq!(hex[3].lon, CENTER.lon, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_area() {
        assert_eq!(circumradius_km(0.0), Err(GeometryError::NonPositiveArea(0.0)));
        assert!(hexagon_vertices(CENTER, -2.0).is_err());
        assert!(hexagon_vertices(CENTER, f64::NAN).is_err());
        assert!(hexagon_vertices(CENTER, f64::INFINITY).is_err());
    }

    #[test]
    fn test_polygon_contains() {
        let hex = hexagon_vertices(CENTER, 21.55).unwrap();
        assert!(polygon_contains(&hex, CENTER));
        assert!(!polygon_contains(&hex, GeoPoint::new(CENTER.lat + 1.0, CENTER.lon)));
        assert!(!polygon_contains(&hex[..2], CENTER));
    }
}
