//! Reconciliation service - one tick over every eligible flight

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use fids_domain::constants::DEFAULT_MAX_CONCURRENT_UPDATES;
use fids_domain::{CandidateFilter, Flight, ReconcilerConfig, Result, SyncOutcome, TickSummary};
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clock_ports::Clock;
use crate::flights::ports::FlightRepository;
use crate::status::StatusCalculator;
use crate::sync::SyncEngine;

/// Tunables for a reconciliation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSettings {
    /// Upper bound on flights processed concurrently. Legs of the same pair
    /// are still serialized by the engine's pair locks.
    pub max_concurrent_updates: usize,
    /// Zone whose calendar day defines "today" for candidate selection.
    pub timezone: Tz,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self { max_concurrent_updates: DEFAULT_MAX_CONCURRENT_UPDATES, timezone: Tz::UTC }
    }
}

impl ReconcileSettings {
    /// # Errors
    /// Returns `FidsError::Config` when the configured zone is unknown.
    pub fn from_config(config: &ReconcilerConfig) -> Result<Self> {
        Ok(Self {
            max_concurrent_updates: config.max_concurrent_updates.max(1),
            timezone: config.timezone()?,
        })
    }
}

/// Drives one reconciliation pass at a time.
pub struct Reconciler {
    repository: Arc<dyn FlightRepository>,
    engine: Arc<SyncEngine>,
    clock: Arc<dyn Clock>,
    calculator: StatusCalculator,
    settings: ReconcileSettings,
    tick_guard: Mutex<()>,
}

enum FlightResult {
    Unchanged,
    Updated { warned: bool },
    Failed,
}

impl Reconciler {
    /// Create a new reconciler
    pub fn new(
        repository: Arc<dyn FlightRepository>,
        engine: Arc<SyncEngine>,
        clock: Arc<dyn Clock>,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            repository,
            engine,
            clock,
            calculator: StatusCalculator::new(),
            settings,
            tick_guard: Mutex::new(()),
        }
    }

    /// Replace the default status calculator
    pub fn with_calculator(mut self, calculator: StatusCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    /// Settings this reconciler was built with
    pub fn settings(&self) -> &ReconcileSettings {
        &self.settings
    }

    /// Run one reconciliation tick.
    ///
    /// Ticks never overlap: a call made while another tick is running waits
    /// for it to finish first. Per-flight failures, including panics, are
    /// counted in the summary and never abort the batch.
    ///
    /// # Errors
    /// Only fails when the candidate set cannot be loaded.
    pub async fn run_tick(&self) -> Result<TickSummary> {
        let _tick = match self.tick_guard.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Reconciliation tick already running; waiting for it to finish");
                self.tick_guard.lock().await
            }
        };

        let started = Instant::now();
        let now = self.clock.now();
        let filter = CandidateFilter::for_reconcile(now, self.settings.timezone);
        let candidates = self.repository.find_active_in_window(&filter).await?;

        let mut summary = TickSummary { total_flights: candidates.len(), ..TickSummary::default() };
        debug!(
            candidates = summary.total_flights,
            from = %filter.scheduled_from,
            to = %filter.scheduled_to,
            "Selected reconciliation candidates"
        );

        let results: Vec<FlightResult> = stream::iter(candidates)
            .map(|flight| self.spawn_flight(flight, now))
            .buffer_unordered(self.settings.max_concurrent_updates.max(1))
            .collect()
            .await;

        for result in results {
            match result {
                FlightResult::Unchanged => {}
                FlightResult::Updated { warned } => {
                    summary.updated_count += 1;
                    summary.warning_count += usize::from(warned);
                }
                FlightResult::Failed => summary.error_count += 1,
            }
        }

        let pruned = self.engine.locks().prune();
        info!(
            total = summary.total_flights,
            updated = summary.updated_count,
            errors = summary.error_count,
            warnings = summary.warning_count,
            pruned_locks = pruned,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Reconciliation tick completed"
        );
        Ok(summary)
    }

    /// Process one candidate in its own task so a panic is contained.
    async fn spawn_flight(&self, flight: Flight, now: DateTime<Utc>) -> FlightResult {
        let engine = Arc::clone(&self.engine);
        let calculator = self.calculator;
        let flight_id = flight.id;

        let handle =
            tokio::spawn(async move { engine.advance(&flight, &calculator, now).await });
        classify(flight_id, handle.await)
    }
}

fn classify(
    flight_id: Uuid,
    joined: std::result::Result<Result<Option<SyncOutcome>>, JoinError>,
) -> FlightResult {
    match joined {
        Ok(Ok(None)) => FlightResult::Unchanged,
        Ok(Ok(Some(outcome))) => FlightResult::Updated { warned: outcome.warning.is_some() },
        Ok(Err(err)) => {
            warn!(flight_id = %flight_id, error = %err, transient = err.is_transient(), "Failed to reconcile flight");
            FlightResult::Failed
        }
        Err(join_err) => {
            error!(flight_id = %flight_id, error = %join_err, "Reconciliation task for flight aborted");
            FlightResult::Failed
        }
    }
}
