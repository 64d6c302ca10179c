//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either
//! a human-readable or a JSON fmt layer. JSON lines carry the usual
//! `timestamp`, `level`, `target` and `fields` keys plus every structured
//! field the forwarder records (`batch_id`, `submitter`, `records`, ...).

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the filter: `RUST_LOG` wins, then the configured level.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(format!("invalid log filter: {e}")))
}

/// Installs the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;

    let result = if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()
    };
    result.map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::debug!(
        service = %config.full_service_name(),
        json_logs = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_rejects_garbage() {
        let config = TelemetryConfig {
            log_level: "deposit_forwarder=loud".to_string(),
            ..TelemetryConfig::default()
        };
        // RUST_LOG may be set in the environment running the tests.
        if std::env::var("RUST_LOG").is_err() {
            assert!(matches!(build_filter(&config), Err(TelemetryError::Config(_))));
        }
    }

    #[test]
    fn test_build_filter_accepts_directives() {
        let config = TelemetryConfig {
            log_level: "info,deposit_forwarder=debug".to_string(),
            ..TelemetryConfig::default()
        };
        assert!(build_filter(&config).is_ok());
    }
}
