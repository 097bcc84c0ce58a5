//! Platform collaborators.
//!
//! The engine does not implement location tracking or geofencing itself; it
//! drives the host platform through [`LocationService`] and asks for
//! notification permission through [`NotificationService`]. Both are owned
//! by the engine and follow an explicit start/stop lifecycle.
//!
//! Responses to asynchronous requests (authorization prompts, geofence
//! crossings) never come back through these traits. They re-enter the engine
//! as [`crate::engine::InboundEvent`]s.
//!
//! # Implementors
//!
//! - [`SimulatedLocationService`] / [`SimulatedNotificationCenter`] -
//!   deterministic in-process doubles used by the CLI simulator and tests

mod simulated;

pub use simulated::{
    PlatformCall, SimulatedLocationService, SimulatedNotificationCenter,
    DEFAULT_PLATFORM_REGION_LIMIT,
};

use std::fmt;

use thiserror::Error;

use crate::geo::Coordinate;
use crate::notify::NotificationRequest;
use crate::region::Region;

/// Which permission an authorization answer refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorizationKind {
    Location,
    Notification,
}

impl fmt::Display for AuthorizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthorizationKind::Location => write!(f, "location"),
            AuthorizationKind::Notification => write!(f, "notification"),
        }
    }
}

/// Current permission state as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizationStatus {
    /// The user has not been asked yet.
    #[default]
    NotDetermined,
    Denied,
    Authorized,
}

/// Direction of a geofence crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Enter,
    Exit,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionKind::Enter => write!(f, "enter"),
            TransitionKind::Exit => write!(f, "exit"),
        }
    }
}

/// A geofence crossing reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTransition {
    pub identifier: String,
    pub kind: TransitionKind,
}

impl RegionTransition {
    pub fn new(identifier: impl Into<String>, kind: TransitionKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }
}

/// Failures reported synchronously by platform calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("Region monitoring is not available on this device")]
    MonitoringUnavailable,

    #[error("Cannot watch more than {limit} regions at once")]
    CapacityExceeded { limit: usize },

    #[error("Platform rejected the request: {0}")]
    Rejected(String),
}

/// Failure to hand a notification to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("Notifications are not authorized")]
    NotAuthorized,

    #[error("Notification delivery failed: {0}")]
    Failed(String),
}

/// The host's location and geofencing subsystem.
pub trait LocationService: Send {
    /// Whether the device supports circular region monitoring.
    fn is_monitoring_available(&self) -> bool;

    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask the user for "always" location access.
    ///
    /// Fire-and-forget: the answer arrives as an authorization inbound event.
    fn request_authorization(&mut self);

    /// Most recent fix known to the platform, if any.
    fn current_location(&self) -> Option<Coordinate>;

    fn start_location_updates(&mut self);

    fn stop_location_updates(&mut self);

    /// Begin watching `region` for crossings.
    fn start_monitoring(&mut self, region: &Region) -> Result<(), PlatformError>;

    /// Stop watching `region`. Unknown regions are ignored.
    fn stop_monitoring(&mut self, region: &Region);
}

/// The host's local notification subsystem.
pub trait NotificationService: Send {
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask the user for alert and sound permission.
    ///
    /// Fire-and-forget: the answer arrives as an authorization inbound event.
    fn request_authorization(&mut self);

    /// Hand a notification to the platform for delivery.
    fn schedule(&mut self, request: NotificationRequest) -> Result<(), DeliveryError>;
}
