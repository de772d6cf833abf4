//! Scheduling infrastructure for automated task execution
//!
//! The reconciliation scheduler follows the workspace runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on shutdown
//! - Structured tracing with metrics integration

pub mod error;
pub mod reconcile_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use reconcile_scheduler::{ReconcileScheduler, ReconcileSchedulerConfig};
