//! # Deposit Telemetry
//!
//! Observability for the batch deposit forwarder.
//!
//! ## Components
//!
//! - **Logs**: `tracing-subscriber` registry with `EnvFilter`, plain or JSON
//! - **Metrics**: Prometheus counters and histograms in a shared registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use deposit_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // forwarder runs here; metrics via deposit_telemetry::gather_metrics()
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DF_SERVICE_NAME` | `deposit-forwarder` | Service name in logs |
//! | `DF_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `DF_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `DF_NETWORK` | `devnet` | Network identifier |

#![warn(missing_docs)]

mod config;
mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};
pub use metrics::{
    gather_metrics, record_batch_processed, record_batch_rejected, register_metrics,
    MetricsHandle, BATCHES_PROCESSED, BATCHES_REJECTED, BATCH_DURATION, BATCH_SIZE,
    DEPOSITS_FORWARDED, REGISTRY, VALUE_FORWARDED_GWEI,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The global subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metrics could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initializes logging and registers the forwarder metrics.
///
/// Returns a guard that should be held for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_logging(&config)?;

    tracing::info!(
        service = %config.full_service_name(),
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { metrics, config })
}

/// Guard that keeps telemetry active.
#[derive(Debug)]
pub struct TelemetryGuard {
    metrics: MetricsHandle,
    config: TelemetryConfig,
}

impl TelemetryGuard {
    /// Metrics registered at startup.
    #[must_use]
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }

    /// Configuration telemetry was started with.
    #[must_use]
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.config.service_name, "Shutting down telemetry");
    }
}
