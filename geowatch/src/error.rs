//! Monitoring error taxonomy.
//!
//! None of these conditions terminate the engine. Each is surfaced to
//! observers as a [`MonitoringEvent`] (or, for `LocationUnknown`, silently
//! skipped) and a failed attempt leaves engine state untouched.

use thiserror::Error;

use crate::event::MonitoringEvent;
use crate::platform::{AuthorizationKind, DeliveryError, PlatformError};

/// Conditions that interrupt monitoring work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitoringError {
    /// The device cannot monitor regions. Reported once, never retried.
    #[error("Region monitoring is not available on this device")]
    CapabilityUnavailable,

    /// No location fix yet. Skipped and retried on the next update.
    #[error("Current location is unknown")]
    LocationUnknown,

    /// The user refused a permission. Requires user action to recover.
    #[error("{kind} authorization denied")]
    AuthorizationDenied {
        kind: AuthorizationKind,
        error: Option<String>,
    },

    /// The platform refused to watch a region.
    #[error("Failed to watch region '{region_id}': {source}")]
    WatchRejected {
        region_id: String,
        source: PlatformError,
    },

    /// A notification could not be handed to the platform.
    #[error(transparent)]
    DeliveryFailed(#[from] DeliveryError),
}

impl MonitoringError {
    /// Whether the condition clears on its own.
    pub fn is_transient(&self) -> bool {
        matches!(self, MonitoringError::LocationUnknown)
    }

    /// The event observers receive for this condition, if any.
    ///
    /// `LocationUnknown` is silent and `DeliveryFailed` is reported by the
    /// notifier's caller rather than the engine.
    pub fn to_event(&self) -> Option<MonitoringEvent> {
        match self {
            MonitoringError::CapabilityUnavailable => Some(MonitoringEvent::MonitoringUnavailable),
            MonitoringError::LocationUnknown => None,
            MonitoringError::AuthorizationDenied {
                kind: AuthorizationKind::Location,
                ..
            } => Some(MonitoringEvent::LocationDenied),
            MonitoringError::AuthorizationDenied {
                kind: AuthorizationKind::Notification,
                error,
            } => Some(MonitoringEvent::NotificationAuthorizationFailed(
                error
                    .clone()
                    .unwrap_or_else(|| "notifications denied by user".to_string()),
            )),
            MonitoringError::WatchRejected { region_id, source } => {
                Some(MonitoringEvent::WatchFailed {
                    region_id: region_id.clone(),
                    reason: source.to_string(),
                })
            }
            MonitoringError::DeliveryFailed(_) => None,
        }
    }
}
