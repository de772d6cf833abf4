//! # FIDS Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The in-memory flight store
//! - The broadcast notifier feeding real-time displays
//! - The periodic reconciliation scheduler
//! - Configuration loading, logging setup and metrics
//!
//! ## Architecture
//! - Implements traits defined in `fids-core`
//! - Depends on `fids-domain` and `fids-core`
//! - Contains all "impure" code (wall clock, channels, files, timers)

pub mod clock;
pub mod config;
pub mod database;
pub mod errors;
pub mod notify;
pub mod observability;
pub mod runtime;
pub mod scheduling;

// Re-export commonly used items
pub use clock::SystemClock;
pub use database::InMemoryFlightRepository;
pub use errors::InfraError;
pub use notify::{BroadcastNotifier, NotificationEnvelope};
pub use runtime::FidsRuntime;
pub use scheduling::{ReconcileScheduler, SchedulerError, SchedulerResult};
