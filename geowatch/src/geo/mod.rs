//! Geographic primitives.
//!
//! Provides the coordinate type shared by every other module and the
//! great-circle distance used for all containment and ranking decisions.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Distance: meters on a spherical earth

use std::f64::consts::PI;
use std::fmt;

use thiserror::Error;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Minimum valid latitude.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude.
pub const MAX_LON: f64 = 180.0;

const DEG_TO_RAD: f64 = PI / 180.0;

/// Errors produced when building coordinates from untrusted input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (expected -90..=90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (expected -180..=180)")]
    InvalidLongitude(f64),
}

/// A WGS-84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without validation.
    ///
    /// Use [`Coordinate::try_new`] for values coming from files or the CLI.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting out-of-range or non-finite values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Great-circle distance to `other` in meters (haversine formula).
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_m(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Great-circle distance between two coordinates in meters.
///
/// Uses the haversine formula, which stays numerically stable for the short
/// distances geofencing cares about.
pub fn distance_m(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude * DEG_TO_RAD;
    let lat2 = to.latitude * DEG_TO_RAD;
    let dlat = (to.latitude - from.latitude) * DEG_TO_RAD;
    let dlon = (to.longitude - from.longitude) * DEG_TO_RAD;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let kyiv = Coordinate::new(50.476078, 30.497851);
        assert_eq!(kyiv.distance_to(&kyiv), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree of arc on the sphere is R * pi / 180 (~111.2 km)
        let d = distance_m(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        let expected = EARTH_RADIUS_M * DEG_TO_RAD;
        assert!((d - expected).abs() < 1e-6, "got {}", d);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Coordinate::new(50.486074, 30.497860);
        let b = Coordinate::new(50.4631324, 30.4916244);
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_short_distance_in_kyiv() {
        // Two catalog points ~1.1 km apart along the meridian
        let a = Coordinate::new(50.476078, 30.497851);
        let b = Coordinate::new(50.486074, 30.497860);
        let d = a.distance_to(&b);
        assert!(d > 1_100.0 && d < 1_120.0, "Expected ~1111m, got {}", d);
    }

    #[test]
    fn test_try_new_rejects_invalid_latitude() {
        assert_eq!(
            Coordinate::try_new(91.0, 0.0),
            Err(CoordError::InvalidLatitude(91.0))
        );
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_try_new_rejects_invalid_longitude() {
        assert_eq!(
            Coordinate::try_new(0.0, -180.5),
            Err(CoordError::InvalidLongitude(-180.5))
        );
    }

    #[test]
    fn test_try_new_accepts_bounds() {
        assert!(Coordinate::try_new(90.0, 180.0).is_ok());
        assert!(Coordinate::try_new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_display() {
        let c = Coordinate::new(50.5, -0.25);
        assert_eq!(c.to_string(), "(50.500000, -0.250000)");
    }
}
