//! Outbound events and their delivery.
//!
//! The engine reports everything observers care about through
//! [`MonitoringEvent`]. Delivery goes through [`EventSink`], which is
//! implemented for a tokio unbounded channel sender (fire-and-forget, never
//! blocks the engine) and for [`CollectingSink`] (in-memory, for tests and
//! simulations).
//!
//! # Example
//!
//! ```
//! use geowatch::event::{EventSink, MonitoringEvent};
//!
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! tx.emit(MonitoringEvent::MonitoringUnavailable);
//! assert_eq!(rx.try_recv().unwrap(), MonitoringEvent::MonitoringUnavailable);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::region::Region;
use crate::visit::VisitState;

/// Everything the engine tells the outside world.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitoringEvent {
    /// The watched set changed.
    ///
    /// `monitored` holds what the platform watches (the expansion region);
    /// `unmonitored` holds the catalog regions evaluated by sweeps instead.
    SelectionChanged {
        monitored: Vec<Region>,
        unmonitored: Vec<Region>,
    },
    /// A new expansion region is being watched.
    ExpansionChanged(Region),
    /// A visit met its dwell requirement. Reported once per visit.
    Entered(VisitState),
    /// The user left a region they were visiting.
    Exited(VisitState),
    /// The device cannot monitor regions at all.
    MonitoringUnavailable,
    /// The user denied location access.
    LocationDenied,
    /// Notification permission was denied or the request failed.
    NotificationAuthorizationFailed(String),
    /// The platform refused to start watching a region.
    WatchFailed { region_id: String, reason: String },
}

impl MonitoringEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            MonitoringEvent::SelectionChanged { .. } => "selection_changed",
            MonitoringEvent::ExpansionChanged(_) => "expansion_changed",
            MonitoringEvent::Entered(_) => "entered",
            MonitoringEvent::Exited(_) => "exited",
            MonitoringEvent::MonitoringUnavailable => "monitoring_unavailable",
            MonitoringEvent::LocationDenied => "location_denied",
            MonitoringEvent::NotificationAuthorizationFailed(_) => {
                "notification_authorization_failed"
            }
            MonitoringEvent::WatchFailed { .. } => "watch_failed",
        }
    }

    /// Whether this event reports a failure condition.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            MonitoringEvent::MonitoringUnavailable
                | MonitoringEvent::LocationDenied
                | MonitoringEvent::NotificationAuthorizationFailed(_)
                | MonitoringEvent::WatchFailed { .. }
        )
    }
}

impl fmt::Display for MonitoringEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitoringEvent::SelectionChanged {
                monitored,
                unmonitored,
            } => write!(
                f,
                "selection changed: {} monitored, {} unmonitored",
                monitored.len(),
                unmonitored.len()
            ),
            MonitoringEvent::ExpansionChanged(region) => {
                write!(f, "expansion region: {}", region)
            }
            MonitoringEvent::Entered(state) => write!(f, "entered {}", state.region_id),
            MonitoringEvent::Exited(state) => write!(f, "exited {}", state.region_id),
            MonitoringEvent::MonitoringUnavailable => {
                write!(f, "region monitoring is unavailable on this device")
            }
            MonitoringEvent::LocationDenied => write!(f, "location access denied"),
            MonitoringEvent::NotificationAuthorizationFailed(error) => {
                write!(f, "notification authorization failed: {}", error)
            }
            MonitoringEvent::WatchFailed { region_id, reason } => {
                write!(f, "failed to watch {}: {}", region_id, reason)
            }
        }
    }
}

/// Receives events from the engine.
///
/// Implementations must not block: the engine calls `emit` from inside
/// platform callbacks.
pub trait EventSink: Send {
    fn emit(&self, event: MonitoringEvent);
}

impl EventSink for mpsc::UnboundedSender<MonitoringEvent> {
    fn emit(&self, event: MonitoringEvent) {
        if self.send(event).is_err() {
            tracing::debug!("Event receiver dropped, discarding event");
        }
    }
}

/// Sink that stores events in memory.
///
/// Clones share storage, so one handle can go to the engine while another
/// inspects what was emitted.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    events: Arc<Mutex<Vec<MonitoringEvent>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events emitted so far.
    pub fn events(&self) -> Vec<MonitoringEvent> {
        self.events.lock().clone()
    }

    /// Remove and return all events emitted so far.
    pub fn drain(&self) -> Vec<MonitoringEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: MonitoringEvent) {
        self.events.lock().push(event);
    }
}
