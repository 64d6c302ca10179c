//! # Domain Invariants
//!
//! Invariants that MUST hold at the end of every successful `process` call.
//! A violation aborts the call and rolls back every forward.
//!
//! - Zero custodial balance: the forwarder holds nothing after the call.
//! - Value conservation: wei forwarded equals wei supplied.
//! - Order preservation: forwards match input order record-for-record.
//! - Sequential indices: upstream indices are consecutive.

use crate::domain::entities::{DepositReceipt, DepositRequest, ValidatorRecord};
use crate::domain::value_objects::U256;
use std::fmt;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// The forwarder's own balance is zero.
#[must_use]
pub fn check_zero_balance_invariant(forwarder_balance: U256) -> bool {
    forwarder_balance.is_zero()
}

/// Everything supplied left the forwarder, nothing more.
#[must_use]
pub fn check_value_conservation_invariant(supplied: U256, forwards: &[DepositRequest]) -> bool {
    let forwarded = forwards
        .iter()
        .try_fold(U256::zero(), |acc, f| acc.checked_add(f.value));
    forwarded == Some(supplied)
}

/// Forward `i` carries record `i`, with its own amount as payment.
#[must_use]
pub fn check_order_invariant(records: &[ValidatorRecord], forwards: &[DepositRequest]) -> bool {
    records.len() == forwards.len()
        && records
            .iter()
            .zip(forwards)
            .all(|(record, forward)| record.to_request() == *forward)
}

/// Upstream indices increase by exactly one per forward.
#[must_use]
pub fn check_sequential_index_invariant(receipts: &[DepositReceipt]) -> bool {
    receipts
        .windows(2)
        .all(|pair| pair[0].index.checked_add(1) == Some(pair[1].index))
}

/// Check all post-forwarding invariants at once.
#[must_use]
pub fn check_all_invariants(
    forwarder_balance: U256,
    supplied: U256,
    records: &[ValidatorRecord],
    forwards: &[DepositRequest],
    receipts: &[DepositReceipt],
) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_zero_balance_invariant(forwarder_balance) {
        violations.push(InvariantViolation::CustodialBalance {
            balance: forwarder_balance,
        });
    }

    if !check_value_conservation_invariant(supplied, forwards) {
        violations.push(InvariantViolation::ValueNotConserved);
    }

    if !check_order_invariant(records, forwards) {
        violations.push(InvariantViolation::OrderNotPreserved);
    }

    if !check_sequential_index_invariant(receipts) {
        violations.push(InvariantViolation::NonSequentialIndices);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The forwarder kept value after forwarding.
    CustodialBalance { balance: U256 },
    /// Forwarded total differs from the supplied value.
    ValueNotConserved,
    /// Forward sequence differs from input order.
    OrderNotPreserved,
    /// Upstream indices are not consecutive.
    NonSequentialIndices,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CustodialBalance { balance } => {
                write!(f, "forwarder retained {balance} wei")
            }
            Self::ValueNotConserved => write!(f, "forwarded value differs from supplied value"),
            Self::OrderNotPreserved => write!(f, "forwards out of input order"),
            Self::NonSequentialIndices => write!(f, "upstream indices not sequential"),
        }
    }
}

// =============================================================================
// LIMITS
// =============================================================================

/// Bounds shared by validation, policy and the reference upstream.
pub mod limits {
    use crate::domain::value_objects::eth_to_gwei;

    /// Default maximum records per batch.
    ///
    /// Sits under both the per-call compute ceiling and the calldata size
    /// ceiling with roughly 1.4-1.9x headroom.
    pub const MAX_BATCH_SIZE: usize = 500;

    /// 1 ETH, the variable-stake minimum and the upstream's own floor.
    pub const MIN_DEPOSIT_GWEI: u64 = eth_to_gwei(1);

    /// 32 ETH, the fixed-stake minimum.
    pub const FIXED_STAKE_GWEI: u64 = eth_to_gwei(32);

    /// 2048 ETH, the upstream's per-record ceiling.
    pub const MAX_DEPOSIT_GWEI: u64 = eth_to_gwei(2048);

    /// Deposits the upstream tree can hold (`2^32 - 1`).
    pub const MAX_DEPOSIT_COUNT: u64 = (1 << 32) - 1;
}

// =============================================================================
// TESTS
// =============================================================================
