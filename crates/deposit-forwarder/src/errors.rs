//! # Error Types
//!
//! All error types for batch deposit forwarding.
//!
//! `ForwarderError` is the single tagged union surfaced by `process`; every
//! variant carries the structured fields a caller needs to pattern-match on
//! the failure kind. Failures of collaborators (`UpstreamError`,
//! `LedgerError`) are wrapped transparently so they surface unchanged.

use crate::domain::invariants::InvariantViolation;
use crate::domain::value_objects::{Address, Hash, U256};
use std::fmt;
use thiserror::Error;

// =============================================================================
// FIELD / BOUND DESCRIPTORS
// =============================================================================

/// Record field whose byte length failed the structural check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordField {
    /// 48-byte validator public key.
    PublicKey,
    /// 32-byte withdrawal credentials.
    WithdrawalCredentials,
    /// 96-byte signature.
    Signature,
}

impl RecordField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PublicKey => "pubkey",
            Self::WithdrawalCredentials => "withdrawal_credentials",
            Self::Signature => "signature",
        }
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which end of the amount policy a record violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmountBound {
    /// Amount below the minimum (gwei).
    Minimum(u64),
    /// Amount above the maximum (gwei).
    Maximum(u64),
}

impl fmt::Display for AmountBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimum(min) => write!(f, "min {min}"),
            Self::Maximum(max) => write!(f, "max {max}"),
        }
    }
}

// =============================================================================
// FORWARDER ERRORS
// =============================================================================

/// Errors returned by the batch deposit forwarder.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForwarderError {
    /// Construction with an unset upstream authority.
    #[error("upstream authority address is zero")]
    ZeroAddress,

    /// The access-control gate is paused.
    #[error("operation paused")]
    OperationPaused,

    /// Bare value transfers are never accepted.
    #[error("direct transfers not allowed")]
    DirectTransferNotAllowed,

    /// Batch is empty or larger than the configured maximum.
    #[error("invalid batch size: {provided} (must be 1..={max})")]
    BatchSizeInvalid { provided: usize, max: usize },

    /// A parallel array's length differs from the number of pubkeys.
    #[error("parameters mismatch: expected {expected} entries, got {provided}")]
    ParametersMismatch { expected: usize, provided: usize },

    /// A record's amount lies outside the amount policy.
    #[error("amount out of range at index {index}: {provided} gwei ({bound} gwei)")]
    AmountOutOfRange {
        index: usize,
        provided: u64,
        bound: AmountBound,
    },

    /// A record field has the wrong byte length.
    #[error("invalid record data at index {index}: {field}")]
    InvalidRecordData { index: usize, field: RecordField },

    /// Supplied value differs from the sum of the record amounts.
    #[error("value mismatch: supplied {supplied} wei, expected {expected} wei")]
    ValueMismatch { supplied: U256, expected: U256 },

    /// The upstream authority rejected a forward.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Native value could not be moved.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A post-forwarding invariant did not hold.
    #[error("invariant violated: {0}")]
    InvariantViolated(InvariantViolation),

    /// Configuration rejected at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ForwarderError {
    /// Stable label for metrics and structured logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ZeroAddress => "zero_address",
            Self::OperationPaused => "operation_paused",
            Self::DirectTransferNotAllowed => "direct_transfer_not_allowed",
            Self::BatchSizeInvalid { .. } => "batch_size_invalid",
            Self::ParametersMismatch { .. } => "parameters_mismatch",
            Self::AmountOutOfRange { .. } => "amount_out_of_range",
            Self::InvalidRecordData { .. } => "invalid_record_data",
            Self::ValueMismatch { .. } => "value_mismatch",
            Self::Upstream(_) => "upstream",
            Self::Ledger(_) => "ledger",
            Self::InvariantViolated(_) => "invariant_violated",
            Self::Config(_) => "config",
        }
    }

    /// Returns true if the error was raised before any value moved.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::OperationPaused
                | Self::BatchSizeInvalid { .. }
                | Self::ParametersMismatch { .. }
                | Self::AmountOutOfRange { .. }
                | Self::InvalidRecordData { .. }
                | Self::ValueMismatch { .. }
        )
    }
}

// =============================================================================
// UPSTREAM ERRORS
// =============================================================================

/// Rejections raised by the upstream registration authority.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Deposit value below the authority's minimum.
    #[error("deposit value too low: {value} wei")]
    DepositValueTooLow { value: U256 },

    /// Deposit value is not a whole number of gwei.
    #[error("deposit value not multiple of gwei: {value} wei")]
    DepositValueNotMultipleOfGwei { value: U256 },

    /// Deposit value does not fit the 64-bit gwei encoding.
    #[error("deposit value too high: {value} wei")]
    DepositValueTooHigh { value: U256 },

    /// The supplied data root does not match the reconstructed one.
    #[error("reconstructed deposit data root {computed:?} does not match supplied {supplied:?}")]
    DataRootMismatch { supplied: Hash, computed: Hash },

    /// No more deposits can be accepted.
    #[error("merkle tree full")]
    TreeFull,

    /// Any other rejection, passed through verbatim.
    #[error("upstream rejected deposit: {0}")]
    Rejected(String),
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors from native value movement.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The payer cannot cover the transfer.
    #[error("insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: U256,
        available: U256,
    },

    /// Crediting would overflow the recipient's balance.
    #[error("balance overflow for {account}")]
    BalanceOverflow { account: Address },
}

// =============================================================================
// ACCESS ERRORS
// =============================================================================

/// Errors from owner-gated operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Caller is not the current owner.
    #[error("unauthorized account: {caller}")]
    Unauthorized { caller: Address },

    /// New owner is the zero address.
    #[error("invalid owner: zero address")]
    InvalidOwner,

    /// `pause` called while already paused.
    #[error("already paused")]
    AlreadyPaused,

    /// `unpause` called while not paused.
    #[error("not paused")]
    NotPaused,
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Errors from configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Batch size bound is zero.
    #[error("max batch size must be at least 1, got {0}")]
    InvalidBatchSize(usize),

    /// Amount policy bounds are inverted or zero.
    #[error("invalid amount policy: min {min} gwei, max {max} gwei")]
    InvalidAmountPolicy { min: u64, max: u64 },

    /// An environment value could not be parsed.
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    /// JSON configuration could not be parsed.
    #[error("config parse error: {0}")]
    Parse(String),
}

// =============================================================================
// TESTS
// =============================================================================
