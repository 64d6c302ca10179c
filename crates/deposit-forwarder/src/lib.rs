//! # Deposit Forwarder - Batched Validator Deposits
//!
//! **Component:** BatchDepositValidator/Forwarder
//! **Architecture:** hexagonal (domain / ports / adapters / service)
//!
//! ## Purpose
//!
//! Accepts a batch of validator registration records plus one attached
//! payment, validates every record, reconciles the payment against the sum
//! of the record amounts, and forwards one deposit per record to an
//! upstream registration authority. The batch is all-or-nothing: if any
//! forward fails, every earlier forward in the same call is rolled back.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Zero custodial balance | `domain/invariants.rs` - `check_zero_balance_invariant()` |
//! | Value conservation | `domain/invariants.rs` - `check_value_conservation_invariant()` |
//! | Order preservation | `domain/invariants.rs` - `check_order_invariant()` |
//! | Sequential upstream indices | `domain/invariants.rs` - `check_sequential_index_invariant()` |
//! | All-or-nothing | `service.rs` - checkpoint / revert around the forwarding loop |
//!
//! ## Validation Order
//!
//! | Step | Check | Error |
//! |------|-------|-------|
//! | 1 | gate not paused | `OperationPaused` |
//! | 2 | `1 <= N <= max_batch_size` | `BatchSizeInvalid` |
//! | 3 | parallel array lengths equal `N` | `ParametersMismatch` |
//! | 4 | per record: amount within policy | `AmountOutOfRange` |
//! | 5 | per record: 48 / 32 / 96 byte lengths | `InvalidRecordData` |
//! | 6 | `supplied_value == sum(amounts) * 10^9` | `ValueMismatch` |
//!
//! ## Amount Policies
//!
//! | Policy | Minimum | Maximum |
//! |--------|---------|---------|
//! | `AmountPolicy::variable()` (default) | 1 ETH | 2048 ETH |
//! | `AmountPolicy::fixed_stake()` | 32 ETH | 2048 ETH |
//!
//! ## Outbound Dependencies
//!
//! | Collaborator | Trait | Purpose |
//! |--------------|-------|---------|
//! | Owner gate | `AccessControl` | Pause flag, owner identity |
//! | Execution environment | `ValueLedger` | Native value movement |
//! | Deposit contract | `DepositAuthority` | Per-record registration |
//! | Log / bus | `EventSink` | `BatchProcessed` summary |
//!
//! ## Usage Example
//!
//! ```ignore
//! use deposit_forwarder::prelude::*;
//!
//! let mut forwarder = create_test_forwarder(ForwarderConfig::default())?;
//! forwarder.ledger_mut().credit(submitter, eth_to_wei(32))?;
//!
//! let result = forwarder.process(submitter, &BatchSubmission::from_records(&[record]))?;
//! assert_eq!(result.records_processed, 1);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        BatchSubmission, DepositReceipt, DepositRequest, ProcessingResult, ValidatedBatch,
        ValidatorRecord,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        eth_to_gwei, eth_to_wei, gwei_to_wei, Address, CredentialKind, Hash, PublicKey,
        Signature, WithdrawalCredentials, U256,
    };

    // Domain logic
    pub use crate::domain::deposit_data::{compute_deposit_data_root, record_data_root};
    pub use crate::domain::invariants::{
        check_all_invariants, limits, InvariantCheckResult, InvariantViolation,
    };
    pub use crate::domain::policy::AmountPolicy;
    pub use crate::domain::validation::validate_batch;

    // Ports
    pub use crate::ports::inbound::BatchDepositApi;
    pub use crate::ports::outbound::{
        AccessControl, Checkpoint, DepositAuthority, EventSink, Journaled, ValueLedger,
    };

    // Events
    pub use crate::events::{
        topics, BatchProcessedPayload, DepositEvent, DepositEventPayload, ForwarderEvent,
    };

    // Errors
    pub use crate::errors::{
        AccessError, AmountBound, ConfigError, ForwarderError, LedgerError, RecordField,
        UpstreamError,
    };

    // Configuration
    pub use crate::config::{ForwarderConfig, ForwarderConfigBuilder};

    // Adapters
    pub use crate::adapters::{
        InMemoryDepositContract, InMemoryLedger, OwnerGate, RecordingEventSink, TracingEventSink,
    };

    // Service
    pub use crate::service::{
        create_test_forwarder, BatchDepositForwarder, InMemoryForwarder, ServiceStats,
    };
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// TESTS
// =============================================================================
