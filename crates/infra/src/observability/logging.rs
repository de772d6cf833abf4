//! Global `tracing` subscriber setup

use fids_domain::{FidsError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the env filter for `config`.
///
/// `RUST_LOG`, when set, overrides the configured level.
///
/// # Errors
/// Returns [`FidsError::Config`] when the configured directive is invalid.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| FidsError::Config(format!("Invalid log level '{}': {e}", config.level)))
}

/// Install the global subscriber: human-readable lines, or JSON lines when
/// `config.json` is set.
///
/// # Errors
/// Returns [`FidsError::Config`] for an invalid level and
/// [`FidsError::Internal`] if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| FidsError::Internal(format!("Failed to install tracing subscriber: {e}")))
}
