//! Per-region visit state.
//!
//! The [`VisitTracker`] records which catalog regions the user currently
//! occupies, when they entered, how long they must dwell before the visit
//! qualifies, and whether the visit has already been reported.
//!
//! The tracker is a plain state container. It never emits events; the
//! engine queries and mutates it while processing callbacks.
//!
//! # Visit lifecycle
//!
//! ```text
//! on_enter ──► VisitState { notified: false }
//!                   │ can_check_in() && !notified
//!                   ▼
//!              mark_notified ──► VisitState { notified: true }
//!                   │
//! on_exit  ◄────────┘   (state removed; next on_enter starts fresh)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::region::Region;
use crate::time::Clock;

/// Default minimum dwell when a region does not specify one.
pub const DEFAULT_MIN_DWELL: Duration = Duration::ZERO;

/// State of one ongoing visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitState {
    /// Identifier of the visited region.
    pub region_id: String,
    /// When the visit started.
    pub entered_at: Instant,
    /// Time the user must stay before the visit qualifies.
    pub min_dwell: Duration,
    /// Whether the qualifying visit has been reported.
    pub notified: bool,
}

impl VisitState {
    fn new(region_id: String, entered_at: Instant, min_dwell: Duration) -> Self {
        Self {
            region_id,
            entered_at,
            min_dwell,
            notified: false,
        }
    }

    /// Whether the dwell requirement is met at `now` (inclusive).
    ///
    /// A dwell that reaches past the clock's range is never met.
    pub fn can_check_in_at(&self, now: Instant) -> bool {
        self.entered_at
            .checked_add(self.min_dwell)
            .is_some_and(|ready_at| now >= ready_at)
    }

    /// Time spent inside the region as of `now`.
    pub fn time_spent(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.entered_at)
    }
}

/// Store of visits for regions the user is currently inside.
pub struct VisitTracker {
    /// Active visits in entry order.
    visits: Vec<VisitState>,
    clock: Arc<dyn Clock>,
    default_min_dwell: Duration,
}

impl std::fmt::Debug for VisitTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisitTracker")
            .field("visits", &self.visits)
            .field("default_min_dwell", &self.default_min_dwell)
            .finish_non_exhaustive()
    }
}

impl VisitTracker {
    /// Create an empty tracker.
    ///
    /// `default_min_dwell` applies to regions without their own dwell requirement.
    pub fn new(clock: Arc<dyn Clock>, default_min_dwell: Duration) -> Self {
        Self {
            visits: Vec::new(),
            clock,
            default_min_dwell,
        }
    }

    /// Start a visit for `region` unless one is already in progress.
    ///
    /// Returns `true` if a new visit was created. Duplicate enters keep the
    /// original entry time.
    pub fn on_enter(&mut self, region: &Region) -> bool {
        if self.state_for(region.identifier()).is_some() {
            tracing::trace!(region = region.identifier(), "Already inside region");
            return false;
        }

        let min_dwell = self.min_dwell_for(region);
        self.visits.push(VisitState::new(
            region.identifier().to_string(),
            self.clock.now(),
            min_dwell,
        ));
        tracing::debug!(
            region = region.identifier(),
            min_dwell_secs = min_dwell.as_secs(),
            "Visit started"
        );
        true
    }

    /// End the visit for `region_id`, returning its final state.
    pub fn on_exit(&mut self, region_id: &str) -> Option<VisitState> {
        let index = self.visits.iter().position(|v| v.region_id == region_id)?;
        let state = self.visits.remove(index);
        tracing::debug!(region = region_id, notified = state.notified, "Visit ended");
        Some(state)
    }

    /// Flag the visit for `region_id` as reported. No-op without a visit.
    ///
    /// Returns the updated state.
    pub fn mark_notified(&mut self, region_id: &str) -> Option<&VisitState> {
        let state = self.visits.iter_mut().find(|v| v.region_id == region_id)?;
        state.notified = true;
        Some(state)
    }

    pub fn state_for(&self, region_id: &str) -> Option<&VisitState> {
        self.visits.iter().find(|v| v.region_id == region_id)
    }

    /// Active visits in entry order.
    pub fn all_active(&self) -> &[VisitState] {
        &self.visits
    }

    /// Whether `state` has met its dwell requirement now.
    pub fn can_check_in(&self, state: &VisitState) -> bool {
        state.can_check_in_at(self.clock.now())
    }

    /// Current time according to the tracker's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    fn min_dwell_for(&self, region: &Region) -> Duration {
        region.min_dwell().unwrap_or(self.default_min_dwell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;
    use crate::time::ManualClock;

    fn tracker(clock: &ManualClock) -> VisitTracker {
        VisitTracker::new(Arc::new(clock.clone()), DEFAULT_MIN_DWELL)
    }

    fn region(id: &str) -> Region {
        Region::new(id, Coordinate::new(0.0, 0.0), 100.0)
    }

    #[test]
    fn test_enter_creates_unnotified_state() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);

        assert!(tracker.on_enter(&region("A")));

        let state = tracker.state_for("A").unwrap();
        assert_eq!(state.entered_at, clock.now());
        assert!(!state.notified);
        assert_eq!(state.min_dwell, Duration::ZERO);
    }

    #[test]
    fn test_enter_is_idempotent() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);
        let start = clock.now();

        tracker.on_enter(&region("A"));
        clock.advance(Duration::from_secs(60));
        assert!(!tracker.on_enter(&region("A")));

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.state_for("A").unwrap().entered_at, start);
    }

    #[test]
    fn test_exit_removes_state() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);
        tracker.on_enter(&region("A"));

        let removed = tracker.on_exit("A").unwrap();

        assert_eq!(removed.region_id, "A");
        assert!(tracker.state_for("A").is_none());
        assert!(tracker.on_exit("A").is_none());
    }

    #[test]
    fn test_mark_notified_without_visit_is_noop() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);

        assert!(tracker.mark_notified("A").is_none());
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_can_check_in_boundary() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);
        tracker.on_enter(&region("A").with_min_dwell(Duration::from_secs(500)));

        clock.advance(Duration::from_secs(499));
        let state = tracker.state_for("A").unwrap().clone();
        assert!(!tracker.can_check_in(&state));

        clock.advance(Duration::from_secs(1));
        assert!(tracker.can_check_in(&state));

        clock.advance(Duration::from_secs(3_600));
        assert!(tracker.can_check_in(&state));
    }

    #[test]
    fn test_unreachable_dwell_never_qualifies() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);
        tracker.on_enter(&region("A").with_min_dwell(Duration::from_secs(u64::MAX)));

        clock.advance(Duration::from_secs(86_400 * 365));
        let state = tracker.state_for("A").unwrap().clone();

        assert!(!state.can_check_in_at(clock.now()));
        assert!(!tracker.can_check_in(&state));
    }

    #[test]
    fn test_notified_is_monotonic_until_exit() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);
        tracker.on_enter(&region("A"));

        assert!(tracker.mark_notified("A").unwrap().notified);
        // A duplicate enter must not reset the flag
        tracker.on_enter(&region("A"));
        assert!(tracker.state_for("A").unwrap().notified);

        tracker.on_exit("A");
        tracker.on_enter(&region("A"));
        assert!(!tracker.state_for("A").unwrap().notified);
    }

    #[test]
    fn test_region_dwell_overrides_default() {
        let clock = ManualClock::new();
        let mut tracker = VisitTracker::new(Arc::new(clock.clone()), Duration::from_secs(120));

        tracker.on_enter(&region("default"));
        tracker.on_enter(&region("custom").with_min_dwell(Duration::from_secs(5)));

        assert_eq!(
            tracker.state_for("default").unwrap().min_dwell,
            Duration::from_secs(120)
        );
        assert_eq!(
            tracker.state_for("custom").unwrap().min_dwell,
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_all_active_in_entry_order() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);
        for id in ["C", "A", "B"] {
            tracker.on_enter(&region(id));
        }
        tracker.on_exit("A");

        let ids: Vec<_> = tracker
            .all_active()
            .iter()
            .map(|v| v.region_id.as_str())
            .collect();
        assert_eq!(ids, vec!["C", "B"]);
    }

    #[test]
    fn test_time_spent() {
        let clock = ManualClock::new();
        let mut tracker = tracker(&clock);
        tracker.on_enter(&region("A"));
        clock.advance(Duration::from_secs(42));

        let state = tracker.state_for("A").unwrap();
        assert_eq!(state.time_spent(tracker.now()), Duration::from_secs(42));
    }
}
