//! Prometheus metrics for the deposit forwarder.
//!
//! All metrics follow the naming convention: `df_<component>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: batches processed, deposits forwarded, value forwarded
//! - **CounterVec**: rejected batches labelled by error kind
//! - **Histogram**: batch size and processing duration

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Batches forwarded in full
    pub static ref BATCHES_PROCESSED: Counter = Counter::new(
        "df_forwarder_batches_processed_total",
        "Total number of batches forwarded in full"
    ).expect("metric creation failed");

    /// Batches rejected, by error kind
    pub static ref BATCHES_REJECTED: CounterVec = CounterVec::new(
        Opts::new("df_forwarder_batches_rejected_total", "Total number of rejected batches"),
        &["kind"]  // kind: ForwarderError::kind()
    ).expect("metric creation failed");

    /// Individual deposits forwarded upstream
    pub static ref DEPOSITS_FORWARDED: Counter = Counter::new(
        "df_forwarder_deposits_forwarded_total",
        "Total number of deposits forwarded upstream"
    ).expect("metric creation failed");

    /// Value forwarded upstream, in gwei
    pub static ref VALUE_FORWARDED_GWEI: Counter = Counter::new(
        "df_forwarder_value_forwarded_gwei_total",
        "Total value forwarded upstream in gwei"
    ).expect("metric creation failed");

    /// Records per successful batch
    pub static ref BATCH_SIZE: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "df_forwarder_batch_size_records",
            "Number of records per forwarded batch"
        ).buckets(exponential_buckets(1.0, 2.0, 10).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Time spent in `process`
    pub static ref BATCH_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "df_forwarder_batch_duration_seconds",
            "Time spent processing a batch"
        ).buckets(exponential_buckets(0.0001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Handle returned once the forwarder metrics are registered.
#[derive(Debug, Clone)]
pub struct MetricsHandle {
    registry: Registry,
}

impl MetricsHandle {
    /// Renders the registry in the Prometheus text format.
    pub fn gather(&self) -> Result<String, TelemetryError> {
        encode(&self.registry)
    }
}

/// Registers every forwarder metric with `REGISTRY`.
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(BATCHES_PROCESSED.clone()),
        Box::new(BATCHES_REJECTED.clone()),
        Box::new(DEPOSITS_FORWARDED.clone()),
        Box::new(VALUE_FORWARDED_GWEI.clone()),
        Box::new(BATCH_SIZE.clone()),
        Box::new(BATCH_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: REGISTRY.clone(),
    })
}

/// Renders `REGISTRY` in the Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
    encode(&REGISTRY)
}

fn encode(registry: &Registry) -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&registry.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Records a batch forwarded in full.
pub fn record_batch_processed(records: usize, value_gwei: u128, elapsed: Duration) {
    BATCHES_PROCESSED.inc();
    DEPOSITS_FORWARDED.inc_by(records as f64);
    VALUE_FORWARDED_GWEI.inc_by(value_gwei as f64);
    BATCH_SIZE.observe(records as f64);
    BATCH_DURATION.observe(elapsed.as_secs_f64());
}

/// Records a rejected batch under its error kind.
pub fn record_batch_rejected(kind: &str, elapsed: Duration) {
    BATCHES_REJECTED.with_label_values(&[kind]).inc();
    BATCH_DURATION.observe(elapsed.as_secs_f64());
}
