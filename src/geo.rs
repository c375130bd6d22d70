//! Geographic primitives: a lat/lng coordinate and great-circle distance.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle (haversine) distance to another coordinate, in meters.
    pub fn great_circle_distance(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlng = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_METERS * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_distance_moscow_stops() {
        let a = Coordinate::new(55.611_087, 37.20829);
        let b = Coordinate::new(55.595_884, 37.209755);
        let d = a.great_circle_distance(&b);
        assert!((d - 1700.0).abs() < 50.0, "distance was {d}");
    }

    #[test]
    fn zero_distance_to_self() {
        let a = Coordinate::new(12.0, 34.0);
        assert_eq!(a.great_circle_distance(&a), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = Coordinate::new(10.0, 10.0);
        let b = Coordinate::new(20.0, -5.0);
        assert!((a.great_circle_distance(&b) - b.great_circle_distance(&a)).abs() < 1e-6);
    }
}
