//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogConfig;
use crate::{Error, Result};

/// Builds the filter: `RUST_LOG` when set, else `log.level`.
pub fn env_filter(log: &LogConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&log.level)
            .map_err(|e| Error::config(format!("Invalid log level '{}': {e}", log.level))),
    }
}

/// Installs the global subscriber.
pub fn init_tracing(log: &LogConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(log)?);
    let installed = if log.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };
    installed.map_err(|e| Error::config(format!("Failed to install tracing subscriber: {e}")))
}
