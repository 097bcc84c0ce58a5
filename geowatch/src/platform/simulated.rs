//! In-process platform doubles.
//!
//! [`SimulatedLocationService`] behaves like a geofencing subsystem: it
//! enforces a watch limit, records every call made to it, and reports
//! crossings of watched regions when the simulated device moves.
//!
//! Clones share state, so a driver keeps one handle to move the device while
//! the engine owns another.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{
    AuthorizationStatus, DeliveryError, LocationService, NotificationService, PlatformError,
    RegionTransition, TransitionKind,
};
use crate::geo::Coordinate;
use crate::notify::NotificationRequest;
use crate::region::Region;

/// Platform ceiling on simultaneously watched regions.
pub const DEFAULT_PLATFORM_REGION_LIMIT: usize = 19;

/// A call the engine made into the simulated platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    RequestAuthorization,
    StartLocationUpdates,
    StopLocationUpdates,
    StartMonitoring(String),
    StopMonitoring(String),
}

#[derive(Debug)]
struct LocationState {
    location: Option<Coordinate>,
    monitoring_available: bool,
    authorization: AuthorizationStatus,
    updating: bool,
    watched: Vec<Region>,
    region_limit: usize,
    calls: Vec<PlatformCall>,
}

/// Simulated geofencing subsystem.
#[derive(Debug, Clone)]
pub struct SimulatedLocationService {
    state: Arc<Mutex<LocationState>>,
}

impl Default for SimulatedLocationService {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedLocationService {
    /// An authorized device with monitoring available and no fix yet.
    pub fn new() -> Self {
        Self::with_region_limit(DEFAULT_PLATFORM_REGION_LIMIT)
    }

    pub fn with_region_limit(region_limit: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(LocationState {
                location: None,
                monitoring_available: true,
                authorization: AuthorizationStatus::Authorized,
                updating: false,
                watched: Vec::new(),
                region_limit,
                calls: Vec::new(),
            })),
        }
    }

    pub fn set_monitoring_available(&self, available: bool) {
        self.state.lock().monitoring_available = available;
    }

    pub fn set_authorization(&self, status: AuthorizationStatus) {
        self.state.lock().authorization = status;
    }

    /// Move the device and report crossings of watched regions.
    ///
    /// The first fix never produces crossings: like a real platform, the
    /// simulator only reports transitions it observed happening.
    pub fn move_to(&self, location: Coordinate) -> Vec<RegionTransition> {
        let mut state = self.state.lock();
        let previous = state.location.replace(location);

        let Some(previous) = previous else {
            return Vec::new();
        };

        state
            .watched
            .iter()
            .filter_map(|region| {
                let was_inside = region.contains(previous);
                let is_inside = region.contains(location);
                match (was_inside, is_inside) {
                    (false, true) => Some(RegionTransition::new(
                        region.identifier(),
                        TransitionKind::Enter,
                    )),
                    (true, false) => Some(RegionTransition::new(
                        region.identifier(),
                        TransitionKind::Exit,
                    )),
                    _ => None,
                }
            })
            .collect()
    }

    /// Forget the current fix.
    pub fn clear_location(&self) {
        self.state.lock().location = None;
    }

    /// Regions currently watched.
    pub fn watched(&self) -> Vec<Region> {
        self.state.lock().watched.clone()
    }

    pub fn is_updating_location(&self) -> bool {
        self.state.lock().updating
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }
}

impl LocationService for SimulatedLocationService {
    fn is_monitoring_available(&self) -> bool {
        self.state.lock().monitoring_available
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        self.state.lock().authorization
    }

    fn request_authorization(&mut self) {
        self.state.lock().calls.push(PlatformCall::RequestAuthorization);
    }

    fn current_location(&self) -> Option<Coordinate> {
        self.state.lock().location
    }

    fn start_location_updates(&mut self) {
        let mut state = self.state.lock();
        state.updating = true;
        state.calls.push(PlatformCall::StartLocationUpdates);
    }

    fn stop_location_updates(&mut self) {
        let mut state = self.state.lock();
        state.updating = false;
        state.calls.push(PlatformCall::StopLocationUpdates);
    }

    fn start_monitoring(&mut self, region: &Region) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        if !state.monitoring_available {
            return Err(PlatformError::MonitoringUnavailable);
        }

        state
            .calls
            .push(PlatformCall::StartMonitoring(region.identifier().to_string()));

        // Re-watching an identifier replaces the previous geometry
        if let Some(existing) = state
            .watched
            .iter_mut()
            .find(|r| r.identifier() == region.identifier())
        {
            *existing = region.clone();
            return Ok(());
        }
        if state.watched.len() >= state.region_limit {
            return Err(PlatformError::CapacityExceeded {
                limit: state.region_limit,
            });
        }
        state.watched.push(region.clone());
        Ok(())
    }

    fn stop_monitoring(&mut self, region: &Region) {
        let mut state = self.state.lock();
        state
            .calls
            .push(PlatformCall::StopMonitoring(region.identifier().to_string()));
        state.watched.retain(|r| r != region);
    }
}

#[derive(Debug)]
struct NotificationState {
    authorization: AuthorizationStatus,
    authorization_requests: usize,
    delivered: Vec<NotificationRequest>,
    failure: Option<String>,
}

/// Simulated notification center.
#[derive(Debug, Clone)]
pub struct SimulatedNotificationCenter {
    state: Arc<Mutex<NotificationState>>,
}

impl Default for SimulatedNotificationCenter {
    fn default() -> Self {
        Self::new(AuthorizationStatus::Authorized)
    }
}

impl SimulatedNotificationCenter {
    pub fn new(authorization: AuthorizationStatus) -> Self {
        Self {
            state: Arc::new(Mutex::new(NotificationState {
                authorization,
                authorization_requests: 0,
                delivered: Vec::new(),
                failure: None,
            })),
        }
    }

    pub fn set_authorization(&self, status: AuthorizationStatus) {
        self.state.lock().authorization = status;
    }

    /// Make every subsequent delivery fail with `reason`, or succeed with `None`.
    pub fn fail_deliveries(&self, reason: Option<String>) {
        self.state.lock().failure = reason;
    }

    pub fn authorization_requests(&self) -> usize {
        self.state.lock().authorization_requests
    }

    /// Notifications accepted so far.
    pub fn delivered(&self) -> Vec<NotificationRequest> {
        self.state.lock().delivered.clone()
    }
}

impl NotificationService for SimulatedNotificationCenter {
    fn authorization_status(&self) -> AuthorizationStatus {
        self.state.lock().authorization
    }

    fn request_authorization(&mut self) {
        self.state.lock().authorization_requests += 1;
    }

    fn schedule(&mut self, request: NotificationRequest) -> Result<(), DeliveryError> {
        let mut state = self.state.lock();
        if state.authorization != AuthorizationStatus::Authorized {
            return Err(DeliveryError::NotAuthorized);
        }
        if let Some(reason) = &state.failure {
            return Err(DeliveryError::Failed(reason.clone()));
        }
        state.delivered.push(request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(id: &str, lat: f64, radius: f64) -> Region {
        Region::new(id, Coordinate::new(lat, 0.0), radius)
    }

    #[test]
    fn test_first_fix_reports_nothing() {
        let mut service = SimulatedLocationService::new();
        service.start_monitoring(&region("A", 0.0, 100.0)).unwrap();

        assert!(service.move_to(Coordinate::new(0.0, 0.0)).is_empty());
        assert_eq!(service.current_location(), Some(Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn test_reports_exit_and_enter() {
        let mut service = SimulatedLocationService::new();
        service.start_monitoring(&region("A", 0.0, 100.0)).unwrap();
        service.move_to(Coordinate::new(0.0, 0.0));

        let exits = service.move_to(Coordinate::new(0.01, 0.0));
        assert_eq!(exits, vec![RegionTransition::new("A", TransitionKind::Exit)]);

        let enters = service.move_to(Coordinate::new(0.0, 0.0));
        assert_eq!(enters, vec![RegionTransition::new("A", TransitionKind::Enter)]);
    }

    #[test]
    fn test_enforces_region_limit() {
        let mut service = SimulatedLocationService::with_region_limit(1);
        service.start_monitoring(&region("A", 0.0, 10.0)).unwrap();

        let err = service.start_monitoring(&region("B", 0.0, 10.0)).unwrap_err();
        assert_eq!(err, PlatformError::CapacityExceeded { limit: 1 });

        // Replacing the same identifier is not a new slot
        assert!(service.start_monitoring(&region("A", 1.0, 20.0)).is_ok());
        assert_eq!(service.watched()[0].radius_m(), 20.0);
    }

    #[test]
    fn test_unavailable_monitoring_rejects_start() {
        let mut service = SimulatedLocationService::new();
        service.set_monitoring_available(false);

        assert_eq!(
            service.start_monitoring(&region("A", 0.0, 10.0)),
            Err(PlatformError::MonitoringUnavailable)
        );
        assert!(service.watched().is_empty());
    }

    #[test]
    fn test_records_calls() {
        let mut service = SimulatedLocationService::new();
        let a = region("A", 0.0, 10.0);
        service.start_location_updates();
        service.start_monitoring(&a).unwrap();
        service.stop_monitoring(&a);

        assert_eq!(
            service.calls(),
            vec![
                PlatformCall::StartLocationUpdates,
                PlatformCall::StartMonitoring("A".to_string()),
                PlatformCall::StopMonitoring("A".to_string()),
            ]
        );
        assert!(service.is_updating_location());
    }

    #[test]
    fn test_notification_center_requires_authorization() {
        let mut center = SimulatedNotificationCenter::new(AuthorizationStatus::Denied);
        let request = NotificationRequest::new("A", "A", "body");

        assert_eq!(center.schedule(request.clone()), Err(DeliveryError::NotAuthorized));

        center.set_authorization(AuthorizationStatus::Authorized);
        assert!(center.schedule(request).is_ok());
        assert_eq!(center.delivered().len(), 1);
    }

    #[test]
    fn test_notification_center_failure_injection() {
        let mut center = SimulatedNotificationCenter::default();
        center.fail_deliveries(Some("quota".to_string()));

        let err = center
            .schedule(NotificationRequest::new("A", "A", "body"))
            .unwrap_err();
        assert_eq!(err, DeliveryError::Failed("quota".to_string()));
    }
}
