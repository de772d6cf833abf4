//! Reconciliation scheduler
//!
//! Runs [`Reconciler::run_tick`] on a fixed interval until stopped. Each tick
//! is spawned as its own task, so a panic inside a tick is reported as a
//! `JoinError` and the loop keeps going.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fids_infra::observability::metrics::ReconcileMetrics;
//! use fids_infra::scheduling::{ReconcileScheduler, ReconcileSchedulerConfig};
//!
//! # async fn example(reconciler: Arc<fids_core::Reconciler>) -> Result<(), fids_infra::SchedulerError> {
//! let mut scheduler = ReconcileScheduler::new(
//!     reconciler,
//!     ReconcileSchedulerConfig::default(),
//!     Arc::new(ReconcileMetrics::new()),
//! );
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use fids_core::Reconciler;
use fids_domain::{ReconcilerConfig, TickSummary};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::observability::metrics::ReconcileMetrics;
use crate::observability::MetricsResult;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the reconciliation scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSchedulerConfig {
    /// Time between the starts of consecutive ticks
    pub interval: Duration,
    /// A disabled scheduler refuses to start
    pub enabled: bool,
    /// Run one tick immediately on start instead of waiting an interval
    pub run_on_start: bool,
    /// How long `stop` waits for the loop (and any running tick) to finish
    pub stop_timeout: Duration,
}

impl Default for ReconcileSchedulerConfig {
    fn default() -> Self {
        Self::from(&ReconcilerConfig::default())
    }
}

impl From<&ReconcilerConfig> for ReconcileSchedulerConfig {
    fn from(config: &ReconcilerConfig) -> Self {
        Self {
            interval: config.interval(),
            enabled: config.enabled,
            run_on_start: config.run_on_start,
            stop_timeout: Duration::from_secs(30),
        }
    }
}

/// Interval scheduler for flight status reconciliation
pub struct ReconcileScheduler {
    reconciler: Arc<Reconciler>,
    config: ReconcileSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
    metrics: Arc<ReconcileMetrics>,
}

impl ReconcileScheduler {
    /// Create a new reconciliation scheduler
    pub fn new(
        reconciler: Arc<Reconciler>,
        config: ReconcileSchedulerConfig,
        metrics: Arc<ReconcileMetrics>,
    ) -> Self {
        Self {
            reconciler,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
            metrics,
        }
    }

    /// Scheduler configuration
    pub fn config(&self) -> &ReconcileSchedulerConfig {
        &self.config
    }

    /// Metrics recorded for every tick
    pub fn metrics(&self) -> &Arc<ReconcileMetrics> {
        &self.metrics
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that runs a tick every `interval`.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::Disabled`] if the configuration disables the job
    /// - [`SchedulerError::AlreadyRunning`] if the scheduler is running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if !self.config.enabled {
            return Err(SchedulerError::Disabled);
        }
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(interval_secs = self.config.interval.as_secs(), "Starting reconcile scheduler");

        // Create a new cancellation token (supports restart after stop)
        self.cancellation_token = CancellationToken::new();

        let reconciler = Arc::clone(&self.reconciler);
        let metrics = Arc::clone(&self.metrics);
        let config = self.config.clone();
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::reconcile_loop(reconciler, metrics, config, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Reconcile scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the background loop and waits for an in-flight tick to finish.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::NotRunning`] if the scheduler is not running
    /// - [`SchedulerError::Timeout`] if the loop does not finish in time
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping reconcile scheduler");
        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            match tokio::time::timeout(self.config.stop_timeout, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => return Err(SchedulerError::TaskJoinFailed(join_err.to_string())),
                Err(_) => {
                    return Err(SchedulerError::Timeout { seconds: self.config.stop_timeout.as_secs() })
                }
            }
        }

        info!("Reconcile scheduler stopped");
        Ok(())
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Run one tick now, outside the interval.
    ///
    /// Works whether or not the loop is running; the reconciler serializes it
    /// with any tick already in progress.
    ///
    /// # Errors
    ///
    /// - [`SchedulerError::Tick`] if the candidate set could not be loaded
    /// - [`SchedulerError::TaskJoinFailed`] if the tick panicked
    pub async fn trigger_now(&self) -> SchedulerResult<TickSummary> {
        Self::execute_tick(&self.reconciler, &self.metrics, "manual").await
    }

    /// Background reconciliation loop
    async fn reconcile_loop(
        reconciler: Arc<Reconciler>,
        metrics: Arc<ReconcileMetrics>,
        config: ReconcileSchedulerConfig,
        cancel: CancellationToken,
    ) {
        let first_tick = if config.run_on_start {
            tokio::time::Instant::now()
        } else {
            tokio::time::Instant::now() + config.interval
        };
        let mut ticker = tokio::time::interval_at(first_tick, config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Reconcile loop cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    // Failures are logged and counted inside; the loop carries on.
                    let _ = Self::execute_tick(&reconciler, &metrics, "interval").await;
                }
            }
        }
    }

    async fn execute_tick(
        reconciler: &Arc<Reconciler>,
        metrics: &ReconcileMetrics,
        trigger: &'static str,
    ) -> SchedulerResult<TickSummary> {
        let started = Instant::now();
        let task_reconciler = Arc::clone(reconciler);
        let joined = tokio::spawn(async move { task_reconciler.run_tick().await }).await;
        let elapsed = started.elapsed();

        match joined {
            Ok(Ok(summary)) => {
                log_metric(metrics.record_tick(&summary, elapsed), "reconcile.tick");
                info!(
                    trigger,
                    total = summary.total_flights,
                    updated = summary.updated_count,
                    errors = summary.error_count,
                    warnings = summary.warning_count,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "reconcile.tick.completed"
                );
                Ok(summary)
            }
            Ok(Err(err)) => {
                log_metric(metrics.record_tick_failure(elapsed), "reconcile.tick.failure");
                error!(trigger, error = %err, "reconcile.tick.failed");
                Err(SchedulerError::Tick(err))
            }
            Err(join_err) => {
                log_metric(metrics.record_tick_failure(elapsed), "reconcile.tick.failure");
                error!(trigger, error = %join_err, "reconcile.tick.aborted");
                Err(SchedulerError::TaskJoinFailed(join_err.to_string()))
            }
        }
    }
}

fn log_metric(result: MetricsResult<()>, metric: &'static str) {
    if let Err(err) = result {
        warn!(metric = metric, error = ?err, "Failed to record scheduler metric");
    }
}

/// Ensure scheduler is stopped when dropped
impl Drop for ReconcileScheduler {
    fn drop(&mut self) {
        // Best-effort: the handle can't be awaited here.
        if self.is_running() && !self.cancellation_token.is_cancelled() {
            warn!("ReconcileScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
