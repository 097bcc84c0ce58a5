//! Engine constants.

use std::time::Duration;

use thiserror::Error;

use crate::expansion::{ExpansionBounds, ExpansionBoundsError};
use crate::visit::DEFAULT_MIN_DWELL;

/// Platform ceiling on simultaneously watched regions.
pub const MAX_MONITORED_REGIONS: usize = 19;

/// Default number of nearest regions reported as monitoring candidates.
///
/// Kept far below the platform ceiling to leave room for other apps.
pub const DEFAULT_CAPACITY: usize = 3;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Capacity {capacity} exceeds the platform limit of {max} regions")]
    CapacityTooLarge { capacity: usize, max: usize },

    #[error("Invalid expansion radius bounds: {0}")]
    Expansion(#[from] ExpansionBoundsError),
}

/// Fixed configuration of a [`crate::engine::MonitoringEngine`].
///
/// Not mutable at runtime; build a new engine to change it.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Maximum regions to monitor at once.
    pub capacity: usize,
    /// Radius bounds for the expansion region.
    pub expansion: ExpansionBounds,
    /// Dwell requirement for regions that do not specify one.
    pub default_min_dwell: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            expansion: ExpansionBounds::default(),
            default_min_dwell: DEFAULT_MIN_DWELL,
        }
    }
}

impl EngineConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_expansion(mut self, expansion: ExpansionBounds) -> Self {
        self.expansion = expansion;
        self
    }

    pub fn with_default_min_dwell(mut self, min_dwell: Duration) -> Self {
        self.default_min_dwell = min_dwell;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity > MAX_MONITORED_REGIONS {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.capacity,
                max: MAX_MONITORED_REGIONS,
            });
        }
        self.expansion.validate()?;
        Ok(())
    }
}
