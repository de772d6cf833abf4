//! Runtime container - wires the engine, reconciler and scheduler together

use std::sync::Arc;
use std::time::Duration;

use fids_core::{Clock, FlightRepository, Notifier, ReconcileSettings, Reconciler, SyncEngine};
use fids_domain::{Config, FidsError, Result, TickSummary};

use crate::clock::SystemClock;
use crate::database::InMemoryFlightRepository;
use crate::notify::BroadcastNotifier;
use crate::observability::metrics::ReconcileMetrics;
use crate::scheduling::{ReconcileScheduler, ReconcileSchedulerConfig, SchedulerError};

/// How long `start` waits for the scheduler to come up
const START_TIMEOUT: Duration = Duration::from_secs(10);

/// Holds every long-lived service of a running engine.
pub struct FidsRuntime {
    /// Validated configuration the runtime was built from.
    pub config: Config,
    /// Flight store shared by the engine and the reconciler.
    pub repository: Arc<InMemoryFlightRepository>,
    /// Feed display gateways subscribe to.
    pub notifier: BroadcastNotifier,
    /// Engine for operator-initiated status updates.
    pub engine: Arc<SyncEngine>,
    /// Reconciler driven by the scheduler.
    pub reconciler: Arc<Reconciler>,
    scheduler: ReconcileScheduler,
}

impl FidsRuntime {
    /// Build a runtime on the system clock.
    ///
    /// # Errors
    /// Returns `FidsError::Config` when `config` does not validate.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a runtime around an explicit clock.
    ///
    /// # Errors
    /// Returns `FidsError::Config` when `config` does not validate.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let settings = ReconcileSettings::from_config(&config.reconciler)?;

        let repository = Arc::new(InMemoryFlightRepository::new());
        let notifier = BroadcastNotifier::default();
        let store: Arc<dyn FlightRepository> = repository.clone();
        let publisher: Arc<dyn Notifier> = Arc::new(notifier.clone());

        let engine = Arc::new(SyncEngine::new(Arc::clone(&store), Arc::clone(&clock), publisher));
        let reconciler = Arc::new(Reconciler::new(store, Arc::clone(&engine), clock, settings));
        let scheduler = ReconcileScheduler::new(
            Arc::clone(&reconciler),
            ReconcileSchedulerConfig::from(&config.reconciler),
            Arc::new(ReconcileMetrics::new()),
        );

        tracing::info!(
            interval_secs = config.reconciler.interval_seconds,
            max_concurrent_updates = settings.max_concurrent_updates,
            timezone = %settings.timezone,
            "FIDS runtime assembled"
        );

        Ok(Self {
            config: config.clone(),
            repository,
            notifier,
            engine,
            reconciler,
            scheduler,
        })
    }

    /// Scheduler metrics
    pub fn metrics(&self) -> &Arc<ReconcileMetrics> {
        self.scheduler.metrics()
    }

    /// Whether periodic reconciliation is running
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Start periodic reconciliation. A disabled scheduler is left idle.
    ///
    /// # Errors
    /// Returns `FidsError::Internal` if the scheduler does not start in time
    /// or is already running.
    pub async fn start(&mut self) -> Result<()> {
        match tokio::time::timeout(START_TIMEOUT, self.scheduler.start()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(SchedulerError::Disabled)) => {
                tracing::info!("Reconciliation disabled; scheduler not started");
                Ok(())
            }
            Ok(Err(err)) => {
                tracing::error!(error = %err, "failed to start reconcile scheduler");
                Err(err.into())
            }
            Err(_) => {
                tracing::error!(
                    timeout_secs = START_TIMEOUT.as_secs(),
                    "Reconcile scheduler start timed out"
                );
                Err(FidsError::Internal(format!(
                    "Reconcile scheduler start timed out after {}s",
                    START_TIMEOUT.as_secs()
                )))
            }
        }
    }

    /// Stop periodic reconciliation. Stopping an idle runtime is a no-op.
    ///
    /// # Errors
    /// Returns `FidsError::Internal` if the running tick does not finish
    /// within the stop timeout.
    pub async fn stop(&mut self) -> Result<()> {
        match self.scheduler.stop().await {
            Ok(()) | Err(SchedulerError::NotRunning) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Run one tick outside the schedule.
    ///
    /// # Errors
    /// Fails when the candidate set cannot be loaded.
    pub async fn reconcile_now(&self) -> Result<TickSummary> {
        Ok(self.scheduler.trigger_now().await?)
    }
}
