//! Configuration loader
//!
//! Loads engine configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `FIDS_RECONCILE_INTERVAL_SECS` is not set, falls back to a file
//!    (`FIDS_CONFIG`, or the first of the probed paths)
//! 3. With no file anywhere, the built-in defaults are used
//! 4. The result is validated before it is returned
//!
//! ## Environment Variables
//! - `FIDS_RECONCILE_INTERVAL_SECS`: Seconds between ticks (required for env
//!   loading)
//! - `FIDS_RECONCILE_ENABLED`: Whether the scheduler runs (true/false)
//! - `FIDS_MAX_CONCURRENT_UPDATES`: Flights processed concurrently per tick
//! - `FIDS_AIRPORT_TIMEZONE`: IANA zone defining "today"
//! - `FIDS_RUN_ON_START`: Tick immediately on start (true/false)
//! - `FIDS_LOG_LEVEL`: `tracing` filter directive
//! - `FIDS_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` and `./fids.{json,toml}` (current directory)
//! 2. `../config.{json,toml}`, `../../config.{json,toml}`
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};

use fids_domain::{Config, FidsError, LoggingConfig, ReconcilerConfig, Result};

use crate::errors::InfraError;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "FIDS_CONFIG";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `FidsError::Config` if:
/// - An environment variable has an invalid value
/// - The config file cannot be read or parsed
/// - The resulting configuration fails validation
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(FidsError::Config(reason)) if reason.starts_with(MISSING_VAR) => {
            tracing::debug!(reason = %reason, "Environment incomplete, trying file");
            let explicit = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
            if explicit.is_some() || probe_config_paths().is_some() {
                load_from_file(explicit)?
            } else {
                tracing::info!("No configuration source found, using defaults");
                Config::default()
            }
        }
        Err(e) => return Err(e),
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// `FIDS_RECONCILE_INTERVAL_SECS` must be present; every other variable
/// falls back to its default.
///
/// # Errors
/// Returns `FidsError::Config` if the interval is missing or any variable
/// has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let interval_seconds = env_var("FIDS_RECONCILE_INTERVAL_SECS").and_then(|s| {
        s.parse::<u64>()
            .map_err(|e| FidsError::Config(format!("Invalid reconcile interval: {e}")))
    })?;

    let defaults = ReconcilerConfig::default();
    let max_concurrent_updates = match std::env::var("FIDS_MAX_CONCURRENT_UPDATES") {
        Ok(s) => s
            .parse::<usize>()
            .map_err(|e| FidsError::Config(format!("Invalid max concurrent updates: {e}")))?,
        Err(_) => defaults.max_concurrent_updates,
    };
    let airport_timezone =
        std::env::var("FIDS_AIRPORT_TIMEZONE").unwrap_or(defaults.airport_timezone);

    let logging_defaults = LoggingConfig::default();

    Ok(Config {
        reconciler: ReconcilerConfig {
            interval_seconds,
            enabled: env_bool("FIDS_RECONCILE_ENABLED", defaults.enabled),
            max_concurrent_updates,
            airport_timezone,
            run_on_start: env_bool("FIDS_RUN_ON_START", defaults.run_on_start),
        },
        logging: LoggingConfig {
            level: std::env::var("FIDS_LOG_LEVEL").unwrap_or(logging_defaults.level),
            json: env_bool("FIDS_LOG_JSON", logging_defaults.json),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `FidsError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(FidsError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            FidsError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`); a missing
/// extension is read as JSON.
///
/// # Errors
/// Returns `FidsError::Config` if format is invalid or parsing fails.
pub fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(FidsError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 8] = [
        "config.json",
        "config.toml",
        "fids.json",
        "fids.toml",
        "../config.json",
        "../config.toml",
        "../../config.json",
        "../../config.toml",
    ];

    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(NAMES.iter().map(|name| cwd.join(name)));
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(NAMES.iter().map(|name| exe_dir.join(name)));
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

const MISSING_VAR: &str = "Missing required environment variable";

/// Get required environment variable
///
/// # Errors
/// Returns `FidsError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| FidsError::Config(format!("{MISSING_VAR}: {key}")))
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
