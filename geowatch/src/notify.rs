//! Visit notifications.
//!
//! Turns `Entered`/`Exited` events into local notification requests and hands
//! them to a [`NotificationService`]. Delivery failures are returned to the
//! caller (the UI collaborator) and never touch engine state.
//!
//! Each notification uses the region identifier as both its request
//! identifier and its title, so a newer notification for the same region
//! replaces an older one on platforms that coalesce by identifier.

use std::time::{Duration, Instant};

use crate::event::MonitoringEvent;
use crate::platform::{DeliveryError, NotificationService};
use crate::visit::VisitState;

/// Delay before a scheduled notification fires.
pub const DEFAULT_TRIGGER_DELAY: Duration = Duration::from_secs(1);

/// A local notification ready to be scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub trigger_after: Duration,
}

impl NotificationRequest {
    pub fn new(
        identifier: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            body: body.into(),
            trigger_after: DEFAULT_TRIGGER_DELAY,
        }
    }
}

/// Build the notification for an entered visit.
pub fn entered_notification(state: &VisitState, now: Instant) -> NotificationRequest {
    let body = format!(
        "Entered and stayed long enough to check in ({}s)",
        state.time_spent(now).as_secs()
    );
    NotificationRequest::new(&state.region_id, &state.region_id, body)
}

/// Build the notification for a finished visit.
pub fn exited_notification(state: &VisitState, now: Instant) -> NotificationRequest {
    let spent = state.time_spent(now).as_secs();
    let body = if state.can_check_in_at(now) {
        format!("Left after checking in ({}s spent)", spent)
    } else {
        format!("Left before staying long enough to check in ({}s spent)", spent)
    };
    NotificationRequest::new(&state.region_id, &state.region_id, body)
}

/// Schedules notifications for visit events.
pub struct VisitNotifier<N: NotificationService> {
    service: N,
}

impl<N: NotificationService> VisitNotifier<N> {
    pub fn new(service: N) -> Self {
        Self { service }
    }

    /// Schedule a notification if `event` is a visit event.
    ///
    /// Returns `Ok(false)` for events that do not produce notifications.
    pub fn handle(&mut self, event: &MonitoringEvent, now: Instant) -> Result<bool, DeliveryError> {
        let request = match event {
            MonitoringEvent::Entered(state) => entered_notification(state, now),
            MonitoringEvent::Exited(state) => exited_notification(state, now),
            _ => return Ok(false),
        };

        let identifier = request.identifier.clone();
        match self.service.schedule(request) {
            Ok(()) => {
                tracing::debug!(region = %identifier, "Notification scheduled");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(region = %identifier, error = %e, "Notification delivery failed");
                Err(e)
            }
        }
    }

    pub fn service(&self) -> &N {
        &self.service
    }
}
