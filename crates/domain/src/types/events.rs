//! Change events published after a status sync

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::flight::Flight;
use super::status::FlightStatus;
use crate::errors::PartialSyncWarning;

/// Emitted once per leg whose status changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightStatusChanged {
    /// Leg that changed.
    pub flight_id: Uuid,
    /// Status before the change.
    pub old_status: FlightStatus,
    /// Status after the change.
    pub new_status: FlightStatus,
    /// Full leg as persisted.
    pub flight: Flight,
}

impl FlightStatusChanged {
    /// Event for `flight`, which now carries its new status.
    pub fn new(old_status: FlightStatus, flight: &Flight) -> Self {
        Self {
            flight_id: flight.id,
            old_status,
            new_status: flight.status,
            flight: flight.clone(),
        }
    }
}

/// Aggregate event emitted once per sync operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSyncCompleted {
    /// Change of the leg the operation targeted.
    pub primary: FlightStatusChanged,
    /// Change propagated to the paired leg, if any.
    pub linked: Option<FlightStatusChanged>,
    /// Set when the paired leg could not be updated.
    pub warning: Option<PartialSyncWarning>,
    /// Clock time of the operation.
    pub occurred_at: DateTime<Utc>,
}

impl StatusSyncCompleted {
    /// Number of legs whose status changed in this operation.
    pub fn legs_updated(&self) -> usize {
        1 + usize::from(self.linked.is_some())
    }
}
