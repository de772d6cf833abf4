//! # FIDS Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (repository, clock, notifier)
//! - The status calculator and visibility filter
//! - The sync engine that propagates a status change to the paired leg
//! - The reconciler that drives one reconciliation tick
//!
//! ## Architecture Principles
//! - Only depends on `fids-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod flights;
pub mod reconcile;
pub mod status;
pub mod sync;

// Infrastructure ports
pub mod clock_ports;
pub mod notifier_ports;

#[cfg(feature = "test-utils")]
pub mod testing;

// Re-export specific items to avoid ambiguity
pub use clock_ports::Clock;
pub use flights::ports::FlightRepository;
pub use notifier_ports::Notifier;
pub use reconcile::{ReconcileSettings, Reconciler};
pub use status::{DisplayWindow, StatusCalculator, StatusThresholds, VisibilityFilter};
pub use sync::{propagated_status, PairLocks, SyncEngine};
