//! Scheduler error types

use fids_domain::FidsError;
use thiserror::Error;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Scheduler is disabled by configuration
    #[error("Scheduler is disabled")]
    Disabled,

    /// Operation timed out
    #[error("Operation timed out after {seconds}s")]
    Timeout {
        /// Limit that was exceeded.
        seconds: u64,
    },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),

    /// The reconciliation tick itself failed
    #[error("Reconciliation tick failed: {0}")]
    Tick(#[from] FidsError),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let fids_err = match err {
            SchedulerError::Tick(inner) => inner,
            SchedulerError::AlreadyRunning
            | SchedulerError::NotRunning
            | SchedulerError::Disabled
            | SchedulerError::Timeout { .. }
            | SchedulerError::TaskJoinFailed(_) => FidsError::Internal(err.to_string()),
        };
        InfraError(fids_err)
    }
}

impl From<SchedulerError> for FidsError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
