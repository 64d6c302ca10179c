//! # Amount Policy
//!
//! Per-record amount bounds, expressed in gwei.
//!
//! Two deployment policies exist: a variable stake size (`[1, 2048]` ETH,
//! the default) and a fixed-stake policy that refuses anything below 32 ETH.
//! Both share the 2048 ETH ceiling of the upstream authority.

use crate::domain::invariants::limits;
use crate::errors::{AmountBound, ConfigError, ForwarderError};
use serde::{Deserialize, Serialize};

/// Inclusive `[min_gwei, max_gwei]` bound on each record's amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountPolicy {
    /// Smallest permitted amount (gwei).
    pub min_gwei: u64,
    /// Largest permitted amount (gwei).
    pub max_gwei: u64,
}

impl AmountPolicy {
    /// Variable stake size: 1 ETH to 2048 ETH.
    #[must_use]
    pub const fn variable() -> Self {
        Self {
            min_gwei: limits::MIN_DEPOSIT_GWEI,
            max_gwei: limits::MAX_DEPOSIT_GWEI,
        }
    }

    /// Fixed stake: at least 32 ETH, capped at 2048 ETH.
    #[must_use]
    pub const fn fixed_stake() -> Self {
        Self {
            min_gwei: limits::FIXED_STAKE_GWEI,
            max_gwei: limits::MAX_DEPOSIT_GWEI,
        }
    }

    /// Parses a policy name (`variable` or `fixed`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "variable" => Some(Self::variable()),
            "fixed" | "fixed_stake" | "fixed-stake" => Some(Self::fixed_stake()),
            _ => None,
        }
    }

    /// Returns true if `amount_gwei` lies within the bounds.
    #[must_use]
    pub const fn contains(&self, amount_gwei: u64) -> bool {
        amount_gwei >= self.min_gwei && amount_gwei <= self.max_gwei
    }

    /// Checks the amount of the record at `index`.
    pub fn check(&self, index: usize, amount_gwei: u64) -> Result<(), ForwarderError> {
        if amount_gwei < self.min_gwei {
            return Err(ForwarderError::AmountOutOfRange {
                index,
                provided: amount_gwei,
                bound: AmountBound::Minimum(self.min_gwei),
            });
        }
        if amount_gwei > self.max_gwei {
            return Err(ForwarderError::AmountOutOfRange {
                index,
                provided: amount_gwei,
                bound: AmountBound::Maximum(self.max_gwei),
            });
        }
        Ok(())
    }

    /// Rejects empty or inverted bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_gwei == 0 || self.min_gwei > self.max_gwei {
            return Err(ConfigError::InvalidAmountPolicy {
                min: self.min_gwei,
                max: self.max_gwei,
            });
        }
        Ok(())
    }
}

impl Default for AmountPolicy {
    fn default() -> Self {
        Self::variable()
    }
}
