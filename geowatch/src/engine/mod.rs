//! Monitoring engine.
//!
//! Ties the catalog, selector, expansion calculator and visit tracker
//! together and reacts to platform callbacks.
//!
//! # Architecture
//!
//! ```text
//!   LocationService ──callbacks──► InboundEvent ──► MonitoringEngine ──► EventSink
//!         ▲                                            │    │    │
//!         └────── start/stop watch (stop first) ───────┘    │    │
//!                                                            ▼    ▼
//!                                         selection + expansion   VisitTracker
//! ```
//!
//! Only one region is ever watched by the platform: the expansion region
//! around the user. Crossing it triggers a containment sweep over the
//! catalog, and leaving it also re-centers it.
//!
//! # State Machine
//!
//! ```text
//! Idle --[location known, catalog non-empty, watch started]--> Active
//! Active --[expansion exit]--> Active (re-centered)
//! Active --[shutdown]--> Idle
//! ```
//!
//! # Example
//!
//! ```
//! use geowatch::config::EngineConfig;
//! use geowatch::engine::{EngineState, MonitoringEngine};
//! use geowatch::event::CollectingSink;
//! use geowatch::geo::Coordinate;
//! use geowatch::platform::SimulatedLocationService;
//! use geowatch::region::{Region, RegionCatalog};
//!
//! let catalog = RegionCatalog::new(vec![
//!     Region::new("cafe", Coordinate::new(50.4761, 30.4979), 100.0),
//! ])
//! .unwrap();
//! let platform = SimulatedLocationService::new();
//! let events = CollectingSink::new();
//!
//! let mut engine = MonitoringEngine::new(EngineConfig::default(), catalog, platform.clone())
//!     .unwrap()
//!     .with_event_sink(events.clone());
//! engine.start();
//!
//! platform.move_to(Coordinate::new(50.47, 30.49));
//! engine.location_updated(Coordinate::new(50.47, 30.49));
//!
//! assert_eq!(engine.state(), EngineState::Active);
//! assert_eq!(events.len(), 2); // selection + expansion
//! ```

mod inbound;
mod monitor;

pub use inbound::{AuthorizationOutcome, InboundEvent};
pub use monitor::{EngineState, MonitoringEngine};
