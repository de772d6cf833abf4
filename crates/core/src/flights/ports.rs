//! Port interfaces for flight persistence
//!
//! These traits define the boundary between the reconciliation engine and
//! whatever store holds the flight legs.

use async_trait::async_trait;
use fids_domain::{CandidateFilter, Flight, Result};
use uuid::Uuid;

/// Trait for loading and persisting flight legs
#[async_trait]
pub trait FlightRepository: Send + Sync {
    /// Get a flight by id, active or not
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Flight>>;

    /// Get every flight matching the candidate filter
    async fn find_active_in_window(&self, filter: &CandidateFilter) -> Result<Vec<Flight>>;

    /// Persist a flight
    ///
    /// Succeeds only if the stored version equals `flight.version`, returning
    /// the stored flight with its version incremented. A stale version yields
    /// `FidsError::Conflict`.
    async fn save(&self, flight: &Flight) -> Result<Flight>;
}
