//! The circular region value type.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::geo::Coordinate;

/// Identifier reserved for the engine-managed expansion region.
///
/// Catalog regions may never use it.
pub const EXPANSION_REGION_IDENTIFIER: &str = "expansion-watch";

/// A circular geofence.
///
/// Regions are immutable once built. Two regions are the same region iff
/// their identifiers match, regardless of geometry.
#[derive(Debug, Clone)]
pub struct Region {
    identifier: String,
    center: Coordinate,
    radius_m: f64,
    min_dwell: Option<Duration>,
}

impl Region {
    /// Create a region with no dwell requirement of its own.
    pub fn new(identifier: impl Into<String>, center: Coordinate, radius_m: f64) -> Self {
        Self {
            identifier: identifier.into(),
            center,
            radius_m,
            min_dwell: None,
        }
    }

    /// Set the minimum time the user must stay inside before the visit qualifies.
    pub fn with_min_dwell(mut self, min_dwell: Duration) -> Self {
        self.min_dwell = Some(min_dwell);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Radius in meters.
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Per-region dwell requirement, if the catalog specified one.
    pub fn min_dwell(&self) -> Option<Duration> {
        self.min_dwell
    }

    /// Whether this is the engine's expansion region.
    pub fn is_expansion(&self) -> bool {
        self.identifier == EXPANSION_REGION_IDENTIFIER
    }

    /// Signed distance from `location` to this region's boundary in meters.
    ///
    /// Negative when `location` lies inside the region.
    pub fn boundary_distance(&self, location: Coordinate) -> f64 {
        self.center.distance_to(&location) - self.radius_m
    }

    /// Whether `location` lies inside the region (boundary inclusive).
    pub fn contains(&self, location: Coordinate) -> bool {
        self.boundary_distance(location) <= 0.0
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Region {}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} r={:.0}m",
            self.identifier, self.center, self.radius_m
        )
    }
}
