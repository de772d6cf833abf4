//! In-process metrics
//!
//! Metrics are organized by concern:
//! - [`reconcile`]: tick counts, per-flight outcomes and tick durations

pub mod reconcile;

pub use reconcile::{ReconcileMetrics, ReconcileMetricsSnapshot, MAX_DURATION_SAMPLES};
