//! Periodic reconciliation
//!
//! One tick selects the candidate flights, asks the status calculator about
//! each of them and hands any due transition to the sync engine. Scheduling
//! the ticks is an infrastructure concern (see `fids-infra`).

pub mod service;

pub use service::{ReconcileSettings, Reconciler};
