//! Integration tests for the monitoring engine.
//!
//! These tests drive the engine through the simulated platform:
//! - Walking a device through a real-world catalog
//! - Dwell-gated check-ins across expansion exits
//! - The async run loop fed by an inbound channel
//! - Notification delivery for visit events
//!
//! Run with: `cargo test --test engine_integration`

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use geowatch::config::EngineConfig;
use geowatch::engine::{EngineState, InboundEvent, MonitoringEngine};
use geowatch::event::{CollectingSink, MonitoringEvent};
use geowatch::geo::Coordinate;
use geowatch::notify::VisitNotifier;
use geowatch::platform::{
    AuthorizationStatus, SimulatedLocationService, SimulatedNotificationCenter,
};
use geowatch::region::{Region, RegionCatalog, EXPANSION_REGION_IDENTIFIER};
use geowatch::selection;
use geowatch::time::{Clock, ManualClock};

// ============================================================================
// Helper Functions
// ============================================================================

/// Regions around Kyiv's Shevchenkivskyi district.
fn kyiv_catalog() -> RegionCatalog {
    let regions = [
        (50.476078, 30.497851, 300.0, "Location 0"),
        (50.486074, 30.497860, 120.0, "Location 1"),
        (50.486074, 30.497860, 59.0, "Location 2"),
        (50.486684, 30.491860, 340.0, "Location 3"),
        (50.486085, 30.495857, 293.0, "Location 4"),
        (50.486085, 30.498857, 89.0, "Location 5"),
        (50.4631324, 30.4916244, 100.0, "Seductive"),
    ]
    .into_iter()
    .map(|(lat, lon, radius, id)| Region::new(id, Coordinate::new(lat, lon), radius))
    .collect();

    RegionCatalog::new(regions).unwrap()
}

struct Walk {
    engine: MonitoringEngine,
    platform: SimulatedLocationService,
    events: CollectingSink,
    clock: ManualClock,
}

impl Walk {
    fn new(config: EngineConfig, catalog: RegionCatalog) -> Self {
        let platform = SimulatedLocationService::new();
        let events = CollectingSink::new();
        let clock = ManualClock::new();
        let mut engine = MonitoringEngine::new(config, catalog, platform.clone())
            .unwrap()
            .with_event_sink(events.clone())
            .with_clock(Arc::new(clock.clone()));
        engine.start();

        Self {
            engine,
            platform,
            events,
            clock,
        }
    }

    /// Move the simulated device and deliver what the platform reports.
    fn step(&mut self, location: Coordinate) -> Vec<MonitoringEvent> {
        let transitions = self.platform.move_to(location);
        self.engine.location_updated(location);
        for transition in transitions {
            self.engine
                .region_transition(&transition.identifier, transition.kind);
        }
        self.events.drain()
    }
}

fn visit_ids(events: &[MonitoringEvent]) -> Vec<(&'static str, String)> {
    events
        .iter()
        .filter_map(|event| match event {
            MonitoringEvent::Entered(state) => Some(("entered", state.region_id.clone())),
            MonitoringEvent::Exited(state) => Some(("exited", state.region_id.clone())),
            _ => None,
        })
        .collect()
}

fn pair(kind: &'static str, id: &str) -> (&'static str, String) {
    (kind, id.to_string())
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Walk from the south through three parts of the catalog.
///
/// Each step lands far enough away to leave the current expansion region,
/// so every step triggers a sweep and a re-centered expansion region.
#[test]
fn test_walk_through_kyiv_catalog() {
    let mut walk = Walk::new(EngineConfig::default(), kyiv_catalog());

    // South of everything: the first fix only establishes the expansion region
    let events = walk.step(Coordinate::new(50.44, 30.49));
    assert_eq!(walk.engine.state(), EngineState::Active);
    assert!(visit_ids(&events).is_empty());
    let first = walk.engine.expansion_region().unwrap().clone();
    assert!(first.radius_m() > 2_000.0 && first.radius_m() <= 3_000.0);

    // Into Seductive
    let events = walk.step(Coordinate::new(50.4631324, 30.4916244));
    assert_eq!(visit_ids(&events), vec![pair("entered", "Seductive")]);
    let expansion = walk.engine.expansion_region().unwrap();
    assert!((expansion.radius_m() - 100.0).abs() < 1e-6);

    // Over to Location 0: enter before exit within one sweep
    let events = walk.step(Coordinate::new(50.476078, 30.497851));
    assert_eq!(
        visit_ids(&events),
        vec![pair("entered", "Location 0"), pair("exited", "Seductive")]
    );

    // The cluster to the north: deepest region first
    let events = walk.step(Coordinate::new(50.486074, 30.497860));
    assert_eq!(
        visit_ids(&events),
        vec![
            pair("entered", "Location 4"),
            pair("entered", "Location 1"),
            pair("entered", "Location 2"),
            pair("entered", "Location 5"),
            pair("exited", "Location 0"),
        ]
    );
    assert_eq!(walk.engine.visits().len(), 4);
    assert!(walk.engine.visits().iter().all(|visit| visit.notified));
    assert_eq!(walk.platform.watched().len(), 1);
    assert_eq!(
        walk.platform.watched()[0].identifier(),
        EXPANSION_REGION_IDENTIFIER
    );
}

/// Every expansion region stays within bounds and never reaches into a
/// catalog region the user is outside of.
#[test]
fn test_expansion_never_crosses_nearest_boundary() {
    let catalog = kyiv_catalog();
    let mut walk = Walk::new(EngineConfig::default(), catalog.clone());
    let points = [
        Coordinate::new(50.44, 30.49),
        Coordinate::new(50.47, 30.45),
        Coordinate::new(50.50, 30.52),
        Coordinate::new(50.4631324, 30.4916244),
    ];

    for point in points {
        walk.step(point);
        let expansion = walk.engine.expansion_region().unwrap();
        let location = walk.engine.last_location().unwrap();
        assert!(expansion.radius_m() >= 50.0 && expansion.radius_m() <= 3_000.0);

        let nearest = selection::nearest(&catalog, location).unwrap();
        let expected = nearest.boundary_distance(location).abs().clamp(50.0, 3_000.0);
        assert!((expansion.radius_m() - expected).abs() < 1e-6);
    }
}

/// Selection ranks by absolute distance to the boundary, not the center.
#[test]
fn test_capacity_one_prefers_nearer_boundary() {
    let catalog = RegionCatalog::new(vec![
        Region::new("A", Coordinate::new(0.0, 0.0), 100.0),
        Region::new("B", Coordinate::new(0.0, 0.0), 300.0),
    ])
    .unwrap();

    let chosen = selection::select(&catalog, Coordinate::new(0.0, 0.0), 1);

    let monitored: Vec<_> = chosen.monitored.iter().map(|r| r.identifier()).collect();
    let unmonitored: Vec<_> = chosen.unmonitored.iter().map(|r| r.identifier()).collect();
    assert_eq!(monitored, vec!["A"]);
    assert_eq!(unmonitored, vec!["B"]);
}

/// Without any location fix a transition emits nothing and changes nothing.
#[test]
fn test_unknown_location_leaves_state_unchanged() {
    let mut walk = Walk::new(EngineConfig::default(), kyiv_catalog());

    walk.engine
        .region_transition(EXPANSION_REGION_IDENTIFIER, geowatch::platform::TransitionKind::Exit);

    assert!(walk.events.is_empty());
    assert_eq!(walk.engine.state(), EngineState::Idle);
    assert!(walk.engine.expansion_region().is_none());
    assert!(walk.engine.visits().is_empty());
}

/// A visit is tracked immediately but only reported once the dwell time
/// has elapsed and another expansion exit triggers a sweep.
#[test]
fn test_dwell_gates_check_in_until_later_exit() {
    let c_center = Coordinate::new(0.01, 0.0);
    let catalog = RegionCatalog::new(vec![
        Region::new("C", c_center, 300.0).with_min_dwell(Duration::from_secs(500))
    ])
    .unwrap();
    let mut walk = Walk::new(EngineConfig::default(), catalog);
    walk.step(Coordinate::new(0.0, 0.0));

    // Just inside C's edge
    let events = walk.step(Coordinate::new(0.0078, 0.0));
    assert!(visit_ids(&events).is_empty());
    let visit = walk.engine.visit("C").unwrap();
    assert!(!visit.notified);

    // Still short of the dwell time on the next sweep
    walk.clock.advance(Duration::from_secs(100));
    let events = walk.step(Coordinate::new(0.0088, 0.0));
    assert!(visit_ids(&events).is_empty());
    assert!(!walk.engine.visit("C").unwrap().notified);

    walk.clock.advance(Duration::from_secs(400));
    let events = walk.step(Coordinate::new(0.0105, 0.0));
    assert_eq!(visit_ids(&events), vec![pair("entered", "C")]);

    // Later sweeps inside C do not report it again
    walk.clock.advance(Duration::from_secs(600));
    let events = walk.step(Coordinate::new(0.0078, 0.0));
    assert!(visit_ids(&events).is_empty());
    assert!(walk.engine.visit("C").unwrap().notified);
}

/// Visit events become notifications titled by region.
#[test]
fn test_visit_events_become_notifications() {
    let mut walk = Walk::new(EngineConfig::default(), kyiv_catalog());
    let center = SimulatedNotificationCenter::new(AuthorizationStatus::Authorized);
    let mut notifier = VisitNotifier::new(center.clone());

    let mut all = Vec::new();
    all.extend(walk.step(Coordinate::new(50.44, 30.49)));
    all.extend(walk.step(Coordinate::new(50.4631324, 30.4916244)));
    walk.clock.advance(Duration::from_secs(90));
    all.extend(walk.step(Coordinate::new(50.476078, 30.497851)));

    let now = walk.clock.now();
    let scheduled = all
        .iter()
        .filter(|event| notifier.handle(event, now).unwrap())
        .count();

    assert_eq!(scheduled, 3);
    let titles: Vec<_> = center.delivered().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Seductive", "Location 0", "Seductive"]);
}

/// The run loop processes queued callbacks serially and shuts down when the
/// inbound channel closes.
#[tokio::test]
async fn test_run_loop_processes_channel() {
    let platform = SimulatedLocationService::new();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let engine = MonitoringEngine::new(EngineConfig::default(), kyiv_catalog(), platform.clone())
        .unwrap()
        .with_event_sink(event_tx);
    let handle = tokio::spawn(engine.run(inbound_rx));

    // First fix, then a crossing into Seductive reported by the platform
    let start = Coordinate::new(50.44, 30.49);
    let seductive = Coordinate::new(50.4631324, 30.4916244);
    platform.move_to(start);
    inbound_tx.send(InboundEvent::from(start)).unwrap();

    let first = event_rx.recv().await.unwrap();
    assert_eq!(first.kind(), "selection_changed");
    let second = event_rx.recv().await.unwrap();
    assert_eq!(second.kind(), "expansion_changed");

    for transition in platform.move_to(seductive) {
        inbound_tx.send(transition.into()).unwrap();
    }
    inbound_tx.send(InboundEvent::from(seductive)).unwrap();
    drop(inbound_tx);

    let engine = handle.await.unwrap();

    assert_eq!(engine.state(), EngineState::Idle);
    assert!(platform.watched().is_empty());
    assert!(!platform.is_updating_location());
    assert!(engine.visit("Seductive").is_some());

    let mut rest = Vec::new();
    while let Ok(event) = event_rx.try_recv() {
        rest.push(event);
    }
    assert!(rest
        .iter()
        .any(|e| matches!(e, MonitoringEvent::Entered(s) if s.region_id == "Seductive")));
}
