//! Telemetry configuration from environment variables.

use std::env;

/// Logging and metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line.
    pub service_name: String,

    /// Log filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression).
    pub log_level: String,

    /// Whether to emit JSON formatted logs.
    pub json_logs: bool,

    /// Network identifier (mainnet, holesky, devnet, ...).
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "deposit-forwarder".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            network: "devnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DF_SERVICE_NAME`: Service name (default: deposit-forwarder)
    /// - `DF_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `DF_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `DF_NETWORK`: Network name (default: devnet)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();

        Self {
            service_name: lookup("DF_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: lookup("DF_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            json_logs: lookup("DF_JSON_LOGS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(is_container),

            network: lookup("DF_NETWORK").unwrap_or(defaults.network),
        }
    }

    /// Service name qualified by network, e.g. `deposit-forwarder-mainnet`.
    #[must_use]
    pub fn full_service_name(&self) -> String {
        format!("{}-{}", self.service_name, self.network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key| map.get(key).map(|v| (*v).to_string())
    }

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "deposit-forwarder");
        assert_eq!(config.log_level, "info");
        assert!(!config.json_logs);
    }

    #[test]
    fn test_from_lookup() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            ("DF_SERVICE_NAME", "forwarder"),
            ("DF_LOG_LEVEL", "debug"),
            ("RUST_LOG", "warn"),
            ("DF_JSON_LOGS", "TRUE"),
            ("DF_NETWORK", "mainnet"),
        ]));

        assert_eq!(config.service_name, "forwarder");
        assert_eq!(config.log_level, "debug");
        assert!(config.json_logs);
        assert_eq!(config.full_service_name(), "forwarder-mainnet");
    }

    #[test]
    fn test_rust_log_fallback_and_container_default() {
        let config = TelemetryConfig::from_lookup(lookup(&[
            ("RUST_LOG", "deposit_forwarder=trace"),
            ("DOCKER_CONTAINER", "1"),
        ]));
        assert_eq!(config.log_level, "deposit_forwarder=trace");
        assert!(config.json_logs);

        let config = TelemetryConfig::from_lookup(lookup(&[
            ("DOCKER_CONTAINER", "1"),
            ("DF_JSON_LOGS", "0"),
        ]));
        assert!(!config.json_logs);
    }
}
