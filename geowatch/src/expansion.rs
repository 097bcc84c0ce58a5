//! Expansion region sizing.
//!
//! The expansion region is a single circle centered on the user. Its radius
//! is the distance the user can travel before the nearest candidate region's
//! relevance may change, so leaving it is the signal to recompute.
//!
//! ```text
//!        nearest region
//!          .-----.
//!         /       \        |d| = |distance(user, center) - radius|
//!        |    *    |<------------ user
//!         \       /            radius = clamp(|d|, min, max)
//!          '-----'
//! ```
//!
//! Clamping keeps the circle away from zero (user standing on a boundary)
//! and from radii so large that recomputation would never trigger.

use thiserror::Error;

use crate::geo::Coordinate;
use crate::region::{Region, EXPANSION_REGION_IDENTIFIER};

/// Default lower bound for the expansion radius in meters.
pub const DEFAULT_MIN_RADIUS_M: f64 = 50.0;

/// Default upper bound for the expansion radius in meters.
pub const DEFAULT_MAX_RADIUS_M: f64 = 3_000.0;

/// Invalid radius bounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpansionBoundsError {
    #[error("Minimum radius must be positive and finite, got {0}")]
    InvalidMinimum(f64),

    #[error("Maximum radius must be finite, got {0}")]
    InvalidMaximum(f64),

    #[error("Minimum radius {min} exceeds maximum radius {max}")]
    Inverted { min: f64, max: f64 },
}

/// Device-tuned bounds for the expansion radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpansionBounds {
    /// Smallest radius the platform reliably reports transitions for.
    pub min_radius_m: f64,
    /// Largest radius before recomputation becomes too rare to be useful.
    pub max_radius_m: f64,
}

impl Default for ExpansionBounds {
    fn default() -> Self {
        Self {
            min_radius_m: DEFAULT_MIN_RADIUS_M,
            max_radius_m: DEFAULT_MAX_RADIUS_M,
        }
    }
}

impl ExpansionBounds {
    /// Create validated bounds.
    pub fn new(min_radius_m: f64, max_radius_m: f64) -> Result<Self, ExpansionBoundsError> {
        let bounds = Self {
            min_radius_m,
            max_radius_m,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Check `0 < min <= max` with finite values.
    pub fn validate(&self) -> Result<(), ExpansionBoundsError> {
        if !self.min_radius_m.is_finite() || self.min_radius_m <= 0.0 {
            return Err(ExpansionBoundsError::InvalidMinimum(self.min_radius_m));
        }
        if !self.max_radius_m.is_finite() {
            return Err(ExpansionBoundsError::InvalidMaximum(self.max_radius_m));
        }
        if self.min_radius_m > self.max_radius_m {
            return Err(ExpansionBoundsError::Inverted {
                min: self.min_radius_m,
                max: self.max_radius_m,
            });
        }
        Ok(())
    }

    /// Clamp a candidate radius into the bounds.
    ///
    /// NaN collapses to the minimum.
    pub fn clamp(&self, radius_m: f64) -> f64 {
        if radius_m.is_nan() {
            return self.min_radius_m;
        }
        radius_m.clamp(self.min_radius_m, self.max_radius_m)
    }
}

/// Computes the expansion region around the user.
#[derive(Debug, Clone, Default)]
pub struct ExpansionRegionCalculator {
    bounds: ExpansionBounds,
}

impl ExpansionRegionCalculator {
    pub fn new(bounds: ExpansionBounds) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> ExpansionBounds {
        self.bounds
    }

    /// Build the expansion region centered on `location`, sized by the
    /// distance from `location` to `nearest`'s boundary.
    pub fn compute(&self, nearest: &Region, location: Coordinate) -> Region {
        let distance_to_boundary = nearest.boundary_distance(location);
        let radius = self.bounds.clamp(distance_to_boundary.abs());

        tracing::debug!(
            nearest = nearest.identifier(),
            distance_to_boundary_m = format!("{:.1}", distance_to_boundary),
            radius_m = format!("{:.1}", radius),
            "Computed expansion region"
        );

        Region::new(EXPANSION_REGION_IDENTIFIER, location, radius)
    }
}
