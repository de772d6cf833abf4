//! Domain types and models
//!
//! The engine operates on a single entity, the [`Flight`] leg. Every physical
//! flight is recorded twice (a departure leg and an arrival leg) joined by
//! `linked_flight_id`.

pub mod events;
pub mod flight;
pub mod reconcile;
pub mod status;

pub use events::{FlightStatusChanged, StatusSyncCompleted};
pub use flight::{Flight, FlightPair, NewFlightPair, PairKey};
pub use reconcile::{CandidateFilter, SyncOutcome, TickSummary};
pub use status::{FlightStatus, LegType};
