//! Time sources.
//!
//! Dwell checks compare "now" against visit entry times. The engine reads
//! the current instant through [`Clock`] so simulations and tests can drive
//! time explicitly instead of sleeping.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A monotonic source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time from [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same underlying time, so a test can keep one handle
/// and give another to the engine.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use geowatch::time::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(500));
/// assert_eq!(clock.now() - start, Duration::from_secs(500));
/// ```
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Start at the current wall-clock instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move time forward.
    ///
    /// Returns `false` and leaves the time unchanged if `by` would carry the
    /// clock past what [`Instant`] can represent.
    pub fn advance(&self, by: Duration) -> bool {
        let mut now = self.now.lock();
        match now.checked_add(by) {
            Some(later) => {
                *now = later;
                true
            }
            None => false,
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("now", &*self.now.lock())
            .finish()
    }
}
