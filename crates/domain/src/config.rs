//! Configuration structures
//!
//! Loaded by `fids-infra` from `FIDS_*` environment variables or a JSON/TOML
//! file. Every section has defaults so partial files are accepted.

use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AIRPORT_TIMEZONE, DEFAULT_MAX_CONCURRENT_UPDATES, DEFAULT_RECONCILE_INTERVAL_SECS,
};
use crate::errors::{FidsError, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Periodic reconciliation settings.
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    /// Returns [`FidsError::Config`] for a zero interval, zero concurrency or
    /// an unknown time zone.
    pub fn validate(&self) -> Result<()> {
        self.reconciler.validate()
    }
}

/// Settings for the periodic reconciliation job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Seconds between the starts of consecutive ticks.
    pub interval_seconds: u64,
    /// A disabled reconciler is never scheduled.
    pub enabled: bool,
    /// Upper bound on flights updated concurrently within one tick.
    pub max_concurrent_updates: usize,
    /// IANA zone whose calendar day defines "today" for candidate selection.
    pub airport_timezone: String,
    /// Run a tick immediately when the scheduler starts.
    pub run_on_start: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_RECONCILE_INTERVAL_SECS,
            enabled: true,
            max_concurrent_updates: DEFAULT_MAX_CONCURRENT_UPDATES,
            airport_timezone: DEFAULT_AIRPORT_TIMEZONE.to_string(),
            run_on_start: true,
        }
    }
}

impl ReconcilerConfig {
    /// Tick interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Parsed airport time zone.
    ///
    /// # Errors
    /// Returns [`FidsError::Config`] when the name is not a known IANA zone.
    pub fn timezone(&self) -> Result<Tz> {
        self.airport_timezone.parse::<Tz>().map_err(|e| {
            FidsError::Config(format!("Invalid airport timezone '{}': {e}", self.airport_timezone))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.interval_seconds == 0 {
            return Err(FidsError::Config("reconciler interval must be positive".into()));
        }
        if self.max_concurrent_updates == 0 {
            return Err(FidsError::Config("max_concurrent_updates must be at least 1".into()));
        }
        self.timezone().map(|_| ())
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive, e.g. `info` or `fids_core=debug`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into(), json: false }
    }
}
