//! Geographic point and distance helpers

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair, stored as (longitude, latitude) like the
/// GeoJSON order used in the persisted documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Great-circle distance to `other` in kilometers (haversine formula).
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// Round a monetary amount to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_distance_to_self() {
        let p = GeoPoint::new(77.2090, 28.6139);
        assert!(p.distance_km(&p) < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(77.2090, 28.6139);
        let b = GeoPoint::new(77.1885, 28.5275);
        let d1 = a.distance_km(&b);
        let d2 = b.distance_km(&a);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        let d = a.distance_km(&b);
        assert!((d - 111.19).abs() < 0.5, "got {}", d);
    }

    #[test]
    fn round2_to_cents() {
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(2.4449), 2.44);
        assert_eq!(round2(3.0), 3.0);
    }
}
