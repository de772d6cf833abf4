//! Observability infrastructure for logging and metrics
//!
//! - [`logging`] installs the global `tracing` subscriber
//! - [`metrics`] keeps in-process counters for the reconciliation job
//!
//! ## Design Principles
//!
//! 1. **Poison Recovery**: mutex locks recover the inner data instead of
//!    panicking; a poisoned metrics buffer must never take the job down.
//! 2. **Ring Buffers**: `VecDeque` for O(1) eviction of old samples.
//! 3. **`MetricsResult` returns** on every record method so callers log and
//!    continue when a metric cannot be recorded.

pub mod logging;
pub mod metrics;

/// Metrics error type
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Empty data set - cannot calculate aggregate metric
    #[error("Empty data: cannot calculate {metric}")]
    EmptyData {
        /// Metric name that failed (e.g., "P95", "P50")
        metric: &'static str,
    },
}

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;
