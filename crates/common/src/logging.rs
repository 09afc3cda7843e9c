//! Logging and tracing initialization.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{FacemouseError, FacemouseResult};

/// Build the env filter for a configuration.
///
/// `RUST_LOG` takes precedence over `config.level` when set.
pub fn build_filter(config: &LoggingConfig) -> FacemouseResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| {
        FacemouseError::config(format!("invalid log filter {:?}: {e}", config.level))
    })
}

/// Install the global tracing subscriber.
///
/// Returns an error if the filter is malformed. A subscriber that is already
/// installed (tests, embedding applications) is left in place.
pub fn init_logging(config: &LoggingConfig) -> FacemouseResult<()> {
    use tracing_subscriber::fmt;

    let env_filter = build_filter(config)?;

    if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .with_current_span(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
    Ok(())
}

/// Initialize logging with defaults (useful for tests and quick scripts).
pub fn init_default_logging() {
    let _ = init_logging(&LoggingConfig::default());
}
