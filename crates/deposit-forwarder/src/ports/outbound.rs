//! # Driven Ports (SPI - Outbound)
//!
//! The collaborators the forwarder depends on:
//! - the access-control gate (pause flag, owner identity)
//! - the value ledger of the execution environment
//! - the upstream registration authority
//! - a sink for the summary event
//!
//! The ledger and the authority are `Journaled`: the forwarder takes a
//! checkpoint before moving any value and reverts to it on any failure, which
//! is what makes a batch all-or-nothing.

use crate::domain::entities::{DepositReceipt, DepositRequest};
use crate::domain::value_objects::{Address, U256};
use crate::errors::{LedgerError, UpstreamError};
use crate::events::ForwarderEvent;

// =============================================================================
// JOURNAL
// =============================================================================

/// Position in a collaborator's journal.
///
/// Checkpoints nest: reverting to an outer checkpoint discards everything
/// recorded after it, including inner checkpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(pub usize);

/// Transactional state owned by the execution environment.
pub trait Journaled {
    /// Marks the current state.
    fn checkpoint(&mut self) -> Checkpoint;

    /// Keeps every change recorded since `checkpoint`.
    fn commit(&mut self, checkpoint: Checkpoint);

    /// Undoes every change recorded since `checkpoint`.
    fn revert(&mut self, checkpoint: Checkpoint);
}

// =============================================================================
// ACCESS CONTROL
// =============================================================================

/// Read-only view of the owner/pause gate.
///
/// Mutation (pause, unpause, ownership transfer) is owner-only and lives on
/// the concrete gate, not here.
pub trait AccessControl: Send + Sync {
    /// Whether `process` must refuse to run.
    fn is_paused(&self) -> bool;

    /// Identity allowed to mutate the gate.
    fn current_owner(&self) -> Address;
}

// =============================================================================
// VALUE LEDGER
// =============================================================================

/// Native value balances.
pub trait ValueLedger: Journaled + Send {
    /// Balance of `account` in wei.
    fn balance_of(&self, account: Address) -> U256;

    /// Moves `amount` wei from `from` to `to`.
    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError>;
}

// =============================================================================
// UPSTREAM AUTHORITY
// =============================================================================

/// The external deposit-accepting service.
///
/// The attached payment has already been credited to the authority's
/// address on the ledger when `register` is called; `request.value` states
/// how much. The authority may reject for its own reasons.
pub trait DepositAuthority: Journaled + Send {
    /// Registers one validator deposit.
    fn register(&mut self, request: &DepositRequest) -> Result<DepositReceipt, UpstreamError>;
}

// =============================================================================
// EVENT SINK
// =============================================================================

/// Destination for events emitted after a successful batch.
pub trait EventSink: Send {
    /// Publishes one event.
    fn emit(&mut self, event: ForwarderEvent);
}

// =============================================================================
// TESTS
// =============================================================================
