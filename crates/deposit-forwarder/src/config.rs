//! Forwarder configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use deposit_forwarder::config::ForwarderConfigBuilder;
//!
//! let config = ForwarderConfigBuilder::new()
//!     .upstream_authority(deposit_contract)
//!     .max_batch_size(100)
//!     .amount_policy(AmountPolicy::fixed_stake())
//!     .build()?;
//! ```

use crate::domain::invariants::limits;
use crate::domain::policy::AmountPolicy;
use crate::domain::value_objects::Address;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;

/// Environment variable holding the upstream authority address.
pub const ENV_UPSTREAM_AUTHORITY: &str = "DF_UPSTREAM_AUTHORITY";
/// Environment variable holding the batch size bound.
pub const ENV_MAX_BATCH_SIZE: &str = "DF_MAX_BATCH_SIZE";
/// Environment variable naming the amount policy (`variable` or `fixed`).
pub const ENV_AMOUNT_POLICY: &str = "DF_AMOUNT_POLICY";

/// Forwarder configuration.
///
/// The upstream authority is fixed for the lifetime of a forwarder; the
/// default leaves it unset, which construction rejects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Where every record is forwarded.
    #[serde(with = "address_hex")]
    pub upstream_authority: Address,
    /// Largest accepted batch.
    pub max_batch_size: usize,
    /// Per-record amount bounds.
    pub amount_policy: AmountPolicy,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            upstream_authority: Address::ZERO,
            max_batch_size: limits::MAX_BATCH_SIZE,
            amount_policy: AmountPolicy::variable(),
        }
    }
}

impl ForwarderConfig {
    /// Default configuration pointing at `upstream_authority`.
    #[must_use]
    pub fn new(upstream_authority: Address) -> Self {
        Self {
            upstream_authority,
            ..Self::default()
        }
    }

    /// Checks the batch size bound and the amount policy.
    ///
    /// A zero upstream address is reported by the forwarder itself as
    /// `ForwarderError::ZeroAddress`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(self.max_batch_size));
        }
        self.amount_policy.validate()
    }

    /// Builder-style method to set the batch size bound.
    #[must_use]
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = max;
        self
    }

    /// Builder-style method to set the amount policy.
    #[must_use]
    pub fn with_amount_policy(mut self, policy: AmountPolicy) -> Self {
        self.amount_policy = policy;
        self
    }

    /// Parses and validates a JSON document. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `DF_UPSTREAM_AUTHORITY`: 0x-hex address (default: unset)
    /// - `DF_MAX_BATCH_SIZE`: batch size bound (default: 500)
    /// - `DF_AMOUNT_POLICY`: `variable` or `fixed` (default: variable)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = ForwarderConfigBuilder::new();

        if let Some(raw) = lookup(ENV_UPSTREAM_AUTHORITY) {
            let address = raw
                .trim()
                .parse::<Address>()
                .map_err(|_| invalid(ENV_UPSTREAM_AUTHORITY, &raw))?;
            builder = builder.upstream_authority(address);
        }

        if let Some(raw) = lookup(ENV_MAX_BATCH_SIZE) {
            let max = raw
                .trim()
                .parse::<usize>()
                .map_err(|_| invalid(ENV_MAX_BATCH_SIZE, &raw))?;
            builder = builder.max_batch_size(max);
        }

        if let Some(raw) = lookup(ENV_AMOUNT_POLICY) {
            let policy =
                AmountPolicy::from_name(raw.trim()).ok_or_else(|| invalid(ENV_AMOUNT_POLICY, &raw))?;
            builder = builder.amount_policy(policy);
        }

        builder.build()
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Builder for `ForwarderConfig` with validation.
#[derive(Debug, Default)]
pub struct ForwarderConfigBuilder {
    upstream_authority: Option<Address>,
    max_batch_size: Option<usize>,
    amount_policy: Option<AmountPolicy>,
}

impl ForwarderConfigBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the upstream authority.
    #[must_use]
    pub fn upstream_authority(mut self, address: Address) -> Self {
        self.upstream_authority = Some(address);
        self
    }

    /// Set the batch size bound.
    #[must_use]
    pub fn max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = Some(max);
        self
    }

    /// Set the amount policy.
    #[must_use]
    pub fn amount_policy(mut self, policy: AmountPolicy) -> Self {
        self.amount_policy = Some(policy);
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<ForwarderConfig, ConfigError> {
        let defaults = ForwarderConfig::default();
        let config = ForwarderConfig {
            upstream_authority: self.upstream_authority.unwrap_or(defaults.upstream_authority),
            max_batch_size: self.max_batch_size.unwrap_or(defaults.max_batch_size),
            amount_policy: self.amount_policy.unwrap_or(defaults.amount_policy),
        };
        config.validate()?;
        Ok(config)
    }
}

mod address_hex {
    use crate::domain::value_objects::Address;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&address.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================
