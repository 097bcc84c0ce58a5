//! The monitoring state machine.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::inbound::{AuthorizationOutcome, InboundEvent};
use crate::config::{ConfigError, EngineConfig};
use crate::error::MonitoringError;
use crate::event::{EventSink, MonitoringEvent};
use crate::expansion::ExpansionRegionCalculator;
use crate::geo::Coordinate;
use crate::platform::{
    AuthorizationKind, AuthorizationStatus, LocationService, NotificationService, PlatformError,
    TransitionKind,
};
use crate::region::{Region, RegionCatalog, EXPANSION_REGION_IDENTIFIER};
use crate::selection::{self, Selection};
use crate::time::{Clock, SystemClock};
use crate::visit::{VisitState, VisitTracker};

/// Engine lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No expansion region yet (no location, empty catalog, or not started).
    Idle,
    /// An expansion region is established and watched.
    Active,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Idle => "Idle",
            EngineState::Active => "Active",
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Adaptive geofence monitoring engine.
///
/// Processes one platform callback at a time to completion. Every callback
/// either succeeds or leaves the engine exactly as it was; failures are
/// reported through the event sink.
///
/// Owns its [`LocationService`]: `start()` begins location updates and
/// `shutdown()` (or drop) stops the watch and the updates.
pub struct MonitoringEngine {
    config: EngineConfig,
    catalog: RegionCatalog,
    calculator: ExpansionRegionCalculator,
    tracker: VisitTracker,
    location_service: Box<dyn LocationService>,
    notification_service: Option<Box<dyn NotificationService>>,
    sink: Option<Box<dyn EventSink>>,
    state: EngineState,
    expansion: Option<Region>,
    last_location: Option<Coordinate>,
    /// Location access was denied; ignore location-driven work.
    location_suspended: bool,
    unavailable_reported: bool,
    started: bool,
}

impl fmt::Debug for MonitoringEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitoringEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("expansion", &self.expansion)
            .field("last_location", &self.last_location)
            .field("visits", &self.tracker.all_active())
            .field("location_suspended", &self.location_suspended)
            .finish_non_exhaustive()
    }
}

impl MonitoringEngine {
    /// Create an engine over `catalog` driving `location_service`.
    ///
    /// Uses the system clock, no notification service and no event sink;
    /// attach those with the `with_*` methods.
    pub fn new(
        config: EngineConfig,
        catalog: RegionCatalog,
        location_service: impl LocationService + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let tracker = VisitTracker::new(Arc::new(SystemClock), config.default_min_dwell);
        Ok(Self {
            calculator: ExpansionRegionCalculator::new(config.expansion),
            config,
            catalog,
            tracker,
            location_service: Box::new(location_service),
            notification_service: None,
            sink: None,
            state: EngineState::Idle,
            expansion: None,
            last_location: None,
            location_suspended: false,
            unavailable_reported: false,
            started: false,
        })
    }

    /// Deliver events to `sink`.
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Use `service` for notification permission requests.
    pub fn with_notification_service(mut self, service: impl NotificationService + 'static) -> Self {
        self.notification_service = Some(Box::new(service));
        self
    }

    /// Read time from `clock` for dwell checks.
    ///
    /// Only meaningful before any visit starts; existing visits are dropped.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.tracker = VisitTracker::new(clock, self.config.default_min_dwell);
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Begin monitoring: check location permission and start updates.
    ///
    /// Calling `start` again while running does nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        tracing::info!(
            regions = self.catalog.len(),
            capacity = self.config.capacity,
            min_radius_m = self.config.expansion.min_radius_m,
            max_radius_m = self.config.expansion.max_radius_m,
            "Monitoring engine started"
        );
        self.request_location_authorization();
    }

    /// Stop watching and stop location updates.
    ///
    /// Visit state is kept; the engine returns to `Idle` and may be started again.
    pub fn shutdown(&mut self) {
        if let Some(region) = self.expansion.take() {
            self.location_service.stop_monitoring(&region);
        }
        if self.started {
            self.location_service.stop_location_updates();
            self.started = false;
            tracing::info!("Monitoring engine stopped");
        }
        self.state = EngineState::Idle;
    }

    /// Process inbound events serially until the channel closes, then shut down.
    ///
    /// Returns the stopped engine so callers can inspect its final state.
    pub async fn run(mut self, mut inbound: mpsc::UnboundedReceiver<InboundEvent>) -> Self {
        self.start();
        while let Some(event) = inbound.recv().await {
            self.handle(event);
        }
        self.shutdown();
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inbound
    // ─────────────────────────────────────────────────────────────────────

    /// Dispatch one inbound event.
    pub fn handle(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::LocationUpdated(location) => self.location_updated(location),
            InboundEvent::RegionTransition(transition) => {
                self.region_transition(&transition.identifier, transition.kind)
            }
            InboundEvent::AuthorizationResult { kind, outcome } => {
                self.authorization_result(kind, outcome)
            }
        }
    }

    /// A new location fix arrived.
    ///
    /// Establishes the expansion region on the first usable fix. Later fixes
    /// only refresh the last known location; re-centering happens when the
    /// platform reports leaving the expansion region.
    pub fn location_updated(&mut self, location: Coordinate) {
        if self.location_suspended {
            tracing::debug!("Location access denied, ignoring location update");
            return;
        }

        self.last_location = Some(location);
        if self.expansion.is_none() {
            self.refresh_expansion();
        }
    }

    /// The platform reported crossing a watched region.
    pub fn region_transition(&mut self, identifier: &str, kind: TransitionKind) {
        if identifier != EXPANSION_REGION_IDENTIFIER {
            tracing::debug!(region = identifier, %kind, "Ignoring transition for unwatched region");
            return;
        }
        if self.location_suspended {
            tracing::debug!(%kind, "Location access denied, ignoring transition");
            return;
        }
        if self.expansion.is_none() {
            tracing::debug!(%kind, "No expansion region established, ignoring stale transition");
            return;
        }

        if let Some(location) = self.location_service.current_location() {
            self.last_location = Some(location);
        }
        let Some(location) = self.last_location else {
            self.report(MonitoringError::LocationUnknown);
            return;
        };

        tracing::debug!(%kind, %location, "Expansion region transition");
        self.sweep(location);

        if kind == TransitionKind::Exit {
            self.refresh_expansion();
        }
    }

    /// The answer to an earlier authorization request arrived.
    pub fn authorization_result(&mut self, kind: AuthorizationKind, outcome: AuthorizationOutcome) {
        match (kind, outcome) {
            (AuthorizationKind::Location, AuthorizationOutcome::Granted) => {
                tracing::info!("Location access granted");
                self.resume_location_updates();
            }
            (AuthorizationKind::Notification, AuthorizationOutcome::Granted) => {
                tracing::info!("Notification access granted");
            }
            (kind, AuthorizationOutcome::Denied { error }) => {
                if kind == AuthorizationKind::Location {
                    self.location_suspended = true;
                }
                self.report(MonitoringError::AuthorizationDenied { kind, error });
            }
        }
    }

    /// Check location permission and act on it.
    ///
    /// Asks the user if undecided (the answer arrives through
    /// [`authorization_result`](Self::authorization_result)), reports a denial,
    /// or starts location updates.
    pub fn request_location_authorization(&mut self) {
        match self.location_service.authorization_status() {
            AuthorizationStatus::NotDetermined => {
                tracing::debug!("Requesting location authorization");
                self.location_service.request_authorization();
            }
            AuthorizationStatus::Denied => {
                self.location_suspended = true;
                self.report(MonitoringError::AuthorizationDenied {
                    kind: AuthorizationKind::Location,
                    error: None,
                });
            }
            AuthorizationStatus::Authorized => self.resume_location_updates(),
        }
    }

    /// Check notification permission, asking the user if undecided.
    pub fn request_notification_authorization(&mut self) {
        let Some(service) = self.notification_service.as_mut() else {
            tracing::debug!("No notification service attached");
            return;
        };

        match service.authorization_status() {
            AuthorizationStatus::NotDetermined => {
                tracing::debug!("Requesting notification authorization");
                service.request_authorization();
            }
            AuthorizationStatus::Denied => self.report(MonitoringError::AuthorizationDenied {
                kind: AuthorizationKind::Notification,
                error: None,
            }),
            AuthorizationStatus::Authorized => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether location-driven work is paused by a location denial.
    pub fn is_location_suspended(&self) -> bool {
        self.location_suspended
    }

    /// The currently watched expansion region.
    pub fn expansion_region(&self) -> Option<&Region> {
        self.expansion.as_ref()
    }

    pub fn last_location(&self) -> Option<Coordinate> {
        self.last_location
    }

    /// Ongoing visits in entry order.
    pub fn visits(&self) -> &[VisitState] {
        self.tracker.all_active()
    }

    pub fn visit(&self, region_id: &str) -> Option<&VisitState> {
        self.tracker.state_for(region_id)
    }

    pub fn catalog(&self) -> &RegionCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The `capacity` nearest regions for the last known location.
    ///
    /// Presentation helper; the platform only ever watches the expansion region.
    pub fn candidate_selection(&self) -> Option<Selection> {
        self.last_location
            .map(|location| selection::select(&self.catalog, location, self.config.capacity))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    fn resume_location_updates(&mut self) {
        self.location_suspended = false;
        self.location_service.start_location_updates();
    }

    /// Recompute and re-watch the expansion region, reporting any failure.
    fn refresh_expansion(&mut self) {
        if let Err(e) = self.recompute_expansion() {
            self.report(e);
        }
    }

    fn recompute_expansion(&mut self) -> Result<(), MonitoringError> {
        let location = self.last_location.ok_or(MonitoringError::LocationUnknown)?;
        let Some(nearest) = selection::nearest(&self.catalog, location) else {
            tracing::debug!("Catalog is empty, nothing to monitor");
            return Ok(());
        };
        let region = self.calculator.compute(nearest, location);

        if !self.location_service.is_monitoring_available() {
            self.release_watch();
            return Err(MonitoringError::CapabilityUnavailable);
        }

        self.replace_watch(region.clone())?;
        self.state = EngineState::Active;

        tracing::info!(
            center = %region.center(),
            radius_m = region.radius_m(),
            "Expansion region updated"
        );
        self.emit(MonitoringEvent::SelectionChanged {
            monitored: vec![region.clone()],
            unmonitored: self.catalog.all().to_vec(),
        });
        self.emit(MonitoringEvent::ExpansionChanged(region));
        Ok(())
    }

    /// Stop watching the current expansion region and fall back to `Idle`.
    fn release_watch(&mut self) {
        if let Some(previous) = self.expansion.take() {
            tracing::info!("Region monitoring lost, releasing expansion watch");
            self.location_service.stop_monitoring(&previous);
        }
        self.state = EngineState::Idle;
    }

    /// Swap the watched expansion region, stopping the old watch first.
    ///
    /// On failure the previous watch is restored so state matches the platform.
    fn replace_watch(&mut self, region: Region) -> Result<(), MonitoringError> {
        if let Some(previous) = &self.expansion {
            self.location_service.stop_monitoring(previous);
        }

        let source = match self.location_service.start_monitoring(&region) {
            Ok(()) => {
                self.expansion = Some(region);
                return Ok(());
            }
            Err(source) => source,
        };

        if let Some(previous) = &self.expansion {
            if let Err(e) = self.location_service.start_monitoring(previous) {
                tracing::warn!(error = %e, "Failed to restore previous expansion watch");
                self.expansion = None;
                self.state = EngineState::Idle;
            }
        }

        Err(match source {
            PlatformError::MonitoringUnavailable => MonitoringError::CapabilityUnavailable,
            other => MonitoringError::WatchRejected {
                region_id: region.identifier().to_string(),
                source: other,
            },
        })
    }

    /// Reconcile visits with `location`.
    ///
    /// The enter pass walks regions deepest-inside first and stops at the
    /// first region not containing the user. Regions are assumed sparse
    /// enough that occupied regions form a prefix of that order; an occupied
    /// region ranked after an unoccupied one is missed until a later sweep.
    fn sweep(&mut self, location: Coordinate) {
        let ranked = selection::rank_by_signed_boundary_distance(self.catalog.all(), location);
        let occupied: Vec<&Region> = ranked
            .iter()
            .take_while(|region| region.contains(location))
            .collect();

        for region in &occupied {
            self.tracker.on_enter(region);
        }

        for region in &occupied {
            let id = region.identifier();
            let qualifies = self
                .tracker
                .state_for(id)
                .is_some_and(|state| !state.notified && self.tracker.can_check_in(state));
            if !qualifies {
                continue;
            }
            if let Some(state) = self.tracker.mark_notified(id).cloned() {
                tracing::info!(region = id, "Entered region");
                self.emit(MonitoringEvent::Entered(state));
            }
        }

        let departed: Vec<String> = self
            .tracker
            .all_active()
            .iter()
            .filter(|visit| {
                self.catalog
                    .get(&visit.region_id)
                    .map_or(true, |region| !region.contains(location))
            })
            .map(|visit| visit.region_id.clone())
            .collect();

        for id in departed {
            if let Some(state) = self.tracker.on_exit(&id) {
                tracing::info!(region = %id, "Exited region");
                self.emit(MonitoringEvent::Exited(state));
            }
        }
    }

    fn report(&mut self, error: MonitoringError) {
        match &error {
            MonitoringError::LocationUnknown => {
                tracing::debug!("Location unknown, skipping until the next update");
            }
            MonitoringError::CapabilityUnavailable => {
                if self.unavailable_reported {
                    tracing::debug!("Region monitoring still unavailable");
                    return;
                }
                self.unavailable_reported = true;
                tracing::warn!("Region monitoring is not available on this device");
            }
            other => tracing::warn!(error = %other, "Monitoring problem"),
        }

        if let Some(event) = error.to_event() {
            self.emit(event);
        }
    }

    fn emit(&self, event: MonitoringEvent) {
        tracing::debug!(event = event.kind(), "Emitting event");
        if let Some(sink) = &self.sink {
            sink.emit(event);
        }
    }
}

impl Drop for MonitoringEngine {
    fn drop(&mut self) {
        if self.started || self.expansion.is_some() {
            self.shutdown();
        }
    }
}
