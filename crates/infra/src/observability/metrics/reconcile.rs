//! Reconciliation job metrics
//!
//! ## Design
//! - **Atomic counters** for tick and flight outcomes
//! - **VecDeque ring buffer** of tick durations for P50/P95
//! - **Poison-safe locking** with explicit match pattern (no .expect())

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use fids_domain::TickSummary;
use serde::Serialize;

use crate::observability::{MetricsError, MetricsResult};

/// Tick durations kept for percentile calculations.
pub const MAX_DURATION_SAMPLES: usize = 512;

/// Counters for the periodic reconciliation job.
#[derive(Debug)]
pub struct ReconcileMetrics {
    ticks_completed: AtomicU64,
    ticks_failed: AtomicU64,
    flights_examined: AtomicU64,
    flights_updated: AtomicU64,
    flight_errors: AtomicU64,
    partial_sync_warnings: AtomicU64,
    tick_durations_ms: Mutex<VecDeque<u64>>,
}

/// Point-in-time copy of [`ReconcileMetrics`], ready to serialize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileMetricsSnapshot {
    /// Ticks that finished.
    pub ticks_completed: u64,
    /// Ticks that failed or were aborted.
    pub ticks_failed: u64,
    /// Candidates examined across all ticks.
    pub flights_examined: u64,
    /// Status changes across all ticks.
    pub flights_updated: u64,
    /// Per-flight failures across all ticks.
    pub flight_errors: u64,
    /// Updates that left the linked leg behind.
    pub partial_sync_warnings: u64,
    /// Median tick duration, if any tick was recorded.
    pub p50_tick_ms: Option<u64>,
    /// 95th percentile tick duration, if any tick was recorded.
    pub p95_tick_ms: Option<u64>,
}

impl Default for ReconcileMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconcileMetrics {
    /// Zeroed counters
    pub fn new() -> Self {
        Self {
            ticks_completed: AtomicU64::new(0),
            ticks_failed: AtomicU64::new(0),
            flights_examined: AtomicU64::new(0),
            flights_updated: AtomicU64::new(0),
            flight_errors: AtomicU64::new(0),
            partial_sync_warnings: AtomicU64::new(0),
            tick_durations_ms: Mutex::new(VecDeque::with_capacity(MAX_DURATION_SAMPLES)),
        }
    }

    /// Record a tick that ran to completion.
    pub fn record_tick(&self, summary: &TickSummary, elapsed: Duration) -> MetricsResult<()> {
        // Relaxed OK: independent counters, snapshot tolerates skew
        self.ticks_completed.fetch_add(1, Ordering::Relaxed);
        self.flights_examined.fetch_add(summary.total_flights as u64, Ordering::Relaxed);
        self.flights_updated.fetch_add(summary.updated_count as u64, Ordering::Relaxed);
        self.flight_errors.fetch_add(summary.error_count as u64, Ordering::Relaxed);
        self.partial_sync_warnings.fetch_add(summary.warning_count as u64, Ordering::Relaxed);
        self.record_duration(elapsed)
    }

    /// Record a tick that could not load its candidates or was aborted.
    pub fn record_tick_failure(&self, elapsed: Duration) -> MetricsResult<()> {
        self.ticks_failed.fetch_add(1, Ordering::Relaxed);
        self.record_duration(elapsed)
    }

    /// P50 tick duration in milliseconds
    ///
    /// Returns `MetricsError::EmptyData` if no tick was recorded.
    pub fn p50_tick_ms(&self) -> MetricsResult<u64> {
        self.percentile(0.50, "P50")
    }

    /// P95 tick duration in milliseconds
    ///
    /// Returns `MetricsError::EmptyData` if no tick was recorded.
    pub fn p95_tick_ms(&self) -> MetricsResult<u64> {
        self.percentile(0.95, "P95")
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> ReconcileMetricsSnapshot {
        ReconcileMetricsSnapshot {
            ticks_completed: self.ticks_completed.load(Ordering::Relaxed),
            ticks_failed: self.ticks_failed.load(Ordering::Relaxed),
            flights_examined: self.flights_examined.load(Ordering::Relaxed),
            flights_updated: self.flights_updated.load(Ordering::Relaxed),
            flight_errors: self.flight_errors.load(Ordering::Relaxed),
            partial_sync_warnings: self.partial_sync_warnings.load(Ordering::Relaxed),
            p50_tick_ms: self.p50_tick_ms().ok(),
            p95_tick_ms: self.p95_tick_ms().ok(),
        }
    }

    fn record_duration(&self, elapsed: Duration) -> MetricsResult<()> {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let mut samples = self.samples("record_duration");
        samples.push_back(ms);
        if samples.len() > MAX_DURATION_SAMPLES {
            samples.pop_front();
        }
        Ok(())
    }

    fn percentile(&self, percentile: f64, metric: &'static str) -> MetricsResult<u64> {
        let samples = self.samples("percentile");
        if samples.is_empty() {
            return Err(MetricsError::EmptyData { metric });
        }

        let mut sorted: Vec<u64> = samples.iter().copied().collect();
        sorted.sort_unstable();
        let index = ((sorted.len() as f64 * percentile) as usize).min(sorted.len() - 1);
        Ok(sorted[index])
    }

    fn samples(&self, operation: &'static str) -> MutexGuard<'_, VecDeque<u64>> {
        match self.tick_durations_ms.lock() {
            Ok(guard) => guard,
            Err(poison_err) => {
                tracing::warn!(
                    metric = "ReconcileMetrics::tick_durations_ms",
                    operation,
                    "Mutex poisoned, recovering data"
                );
                poison_err.into_inner()
            }
        }
    }
}
