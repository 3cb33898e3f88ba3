//! crates/logging/src/subscriber.rs
//! Global subscriber installation.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use super::config::VerbosityConfig;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum InitError {
    /// The filter directives derived from the configuration were rejected.
    #[error("invalid tracing filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    /// Another global subscriber was already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Installs a formatted stderr subscriber filtered by `config`.
///
/// When `RUST_LOG` is set it takes precedence over `config`.
pub fn init_tracing(config: &VerbosityConfig) -> Result<(), InitError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.filter_directives())?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| InitError::AlreadyInstalled)
}
