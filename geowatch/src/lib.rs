//! GeoWatch - Adaptive geofence monitoring
//!
//! Platforms can only watch a small number of geographic regions at once.
//! GeoWatch watches a single "expansion" region around the user whose edge
//! lies exactly at the nearest catalog boundary. Crossing it means the user
//! may have entered or left a catalog region, so the engine re-evaluates
//! containment, tracks dwell time per visit, and reports qualifying visits.
//!
//! # Modules
//!
//! - [`geo`] - coordinates and great-circle distance
//! - [`region`] - catalog regions and the region catalog
//! - [`selection`] - boundary-distance ranking and nearest-N selection
//! - [`expansion`] - sizing the expansion region
//! - [`visit`] - per-region visit and dwell state
//! - [`engine`] - the monitoring state machine
//! - [`platform`] - location and notification service seams, with simulators
//! - [`notify`] - turning visit events into local notifications
//! - [`config`] - engine settings and the INI config file
//! - [`logging`] - tracing setup

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod expansion;
pub mod geo;
pub mod logging;
pub mod notify;
pub mod platform;
pub mod region;
pub mod selection;
pub mod time;
pub mod visit;

pub use engine::{EngineState, MonitoringEngine};
pub use error::MonitoringError;
pub use event::MonitoringEvent;
