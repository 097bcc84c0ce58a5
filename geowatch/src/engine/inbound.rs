//! Events delivered to the engine by the platform.

use crate::geo::Coordinate;
use crate::platform::{AuthorizationKind, RegionTransition, TransitionKind};

/// Answer to an authorization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Granted,
    Denied {
        /// Platform error accompanying the denial, if any.
        error: Option<String>,
    },
}

impl AuthorizationOutcome {
    pub fn denied() -> Self {
        AuthorizationOutcome::Denied { error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        AuthorizationOutcome::Denied {
            error: Some(error.into()),
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, AuthorizationOutcome::Granted)
    }
}

/// A platform callback, queued for serial processing.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    LocationUpdated(Coordinate),
    RegionTransition(RegionTransition),
    AuthorizationResult {
        kind: AuthorizationKind,
        outcome: AuthorizationOutcome,
    },
}

impl InboundEvent {
    pub fn transition(identifier: impl Into<String>, kind: TransitionKind) -> Self {
        InboundEvent::RegionTransition(RegionTransition::new(identifier, kind))
    }
}

impl From<RegionTransition> for InboundEvent {
    fn from(transition: RegionTransition) -> Self {
        InboundEvent::RegionTransition(transition)
    }
}

impl From<Coordinate> for InboundEvent {
    fn from(location: Coordinate) -> Self {
        InboundEvent::LocationUpdated(location)
    }
}
