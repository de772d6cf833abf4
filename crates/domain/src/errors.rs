//! Error types used throughout the engine

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::types::FlightStatus;

/// Main error type for FIDS
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FidsError {
    /// Malformed input, raised when a flight pair is created.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Flight is missing or has been soft-deleted.
    #[error("Flight not found: {0}")]
    NotFound(Uuid),

    /// Requested status is not reachable from the current one.
    #[error("Invalid status transition for flight {flight_id}: {from} -> {to}")]
    Transition {
        /// Leg the update targeted.
        flight_id: Uuid,
        /// Status the leg holds.
        from: FlightStatus,
        /// Status that was requested.
        to: FlightStatus,
    },

    /// Optimistic version check failed on save.
    #[error("Concurrent modification of flight {flight_id} (expected version {expected}, found {found})")]
    Conflict {
        /// Leg whose save was rejected.
        flight_id: Uuid,
        /// Version the writer read.
        expected: u64,
        /// Version currently stored.
        found: u64,
    },

    /// Storage adapter failure.
    #[error("Repository error: {0}")]
    Repository(String),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unexpected failure inside the engine or its runtime.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FidsError {
    /// True for failures that a later reconciliation tick may resolve on its
    /// own (stale versions, unavailable storage).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::Repository(_))
    }
}

/// Result type alias for FIDS operations
pub type Result<T> = std::result::Result<T, FidsError>;

/// Non-fatal outcome of a status sync: the primary leg was committed but the
/// linked leg could not be loaded or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSyncWarning {
    /// Leg whose status was committed.
    pub primary_id: Uuid,
    /// Leg that could not be updated.
    pub linked_id: Uuid,
    /// Why the linked update failed.
    pub reason: String,
}

impl std::fmt::Display for PartialSyncWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "flight {} updated but linked flight {} was not synchronized: {}",
            self.primary_id, self.linked_id, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_error_names_both_statuses() {
        let err = FidsError::Transition {
            flight_id: Uuid::nil(),
            from: FlightStatus::Landed,
            to: FlightStatus::Boarding,
        };
        let message = err.to_string();
        assert!(message.contains("landed -> boarding"), "{message}");
    }

    #[test]
    fn conflicts_and_repository_failures_are_transient() {
        let conflict = FidsError::Conflict { flight_id: Uuid::nil(), expected: 1, found: 2 };
        assert!(conflict.is_transient());
        assert!(FidsError::Repository("down".into()).is_transient());
        assert!(!FidsError::NotFound(Uuid::nil()).is_transient());
    }

    #[test]
    fn errors_serialize_with_type_tag() {
        let json = serde_json::to_value(FidsError::Validation("bad code".into())).unwrap();
        assert_eq!(json["type"], "Validation");
        assert_eq!(json["message"], "bad code");
    }
}
