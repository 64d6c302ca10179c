//! # Deposit Contract Adapter
//!
//! In-memory upstream registration authority.
//!
//! Applies the authority's own acceptance rules, independent of the
//! forwarder's validation:
//! - value at least 1 ETH
//! - value a whole number of gwei
//! - gwei amount fits in 64 bits
//! - deposit count below `2^32 - 1`
//! - supplied data root equals the reconstructed one
//!
//! Accepted deposits get sequential indices and a `DepositEvent`.

use crate::domain::deposit_data::request_data_root;
use crate::domain::entities::{DepositReceipt, DepositRequest};
use crate::domain::invariants::limits;
use crate::domain::value_objects::{gwei_to_wei, Address, U256, WEI_PER_GWEI};
use crate::errors::UpstreamError;
use crate::events::{topics, DepositEvent};
use crate::ports::outbound::{Checkpoint, DepositAuthority, Journaled};
use tracing::debug;

/// Reference upstream authority.
#[derive(Debug)]
pub struct InMemoryDepositContract {
    address: Address,
    deposit_count: u64,
    events: Vec<DepositEvent>,
}

impl InMemoryDepositContract {
    /// Creates an empty authority living at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self::with_deposit_count(address, 0)
    }

    /// Creates an authority that has already accepted `deposit_count` deposits.
    #[must_use]
    pub fn with_deposit_count(address: Address, deposit_count: u64) -> Self {
        Self {
            address,
            deposit_count,
            events: Vec::new(),
        }
    }

    /// Where the authority receives payments.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Deposits accepted so far, including any preloaded count.
    #[must_use]
    pub fn deposit_count(&self) -> u64 {
        self.deposit_count
    }

    /// Events for deposits accepted by this instance, oldest first.
    #[must_use]
    pub fn events(&self) -> &[DepositEvent] {
        &self.events
    }

    /// Sum of the amounts of recorded events (gwei).
    #[must_use]
    pub fn total_deposited_gwei(&self) -> u128 {
        self.events
            .iter()
            .map(|event| u128::from(event.amount_gwei()))
            .sum()
    }

    fn amount_gwei(value: U256) -> Result<u64, UpstreamError> {
        if value < gwei_to_wei(limits::MIN_DEPOSIT_GWEI) {
            return Err(UpstreamError::DepositValueTooLow { value });
        }

        let wei_per_gwei = U256::from(WEI_PER_GWEI);
        if !(value % wei_per_gwei).is_zero() {
            return Err(UpstreamError::DepositValueNotMultipleOfGwei { value });
        }

        let gwei = value / wei_per_gwei;
        if gwei > U256::from(u64::MAX) {
            return Err(UpstreamError::DepositValueTooHigh { value });
        }
        Ok(gwei.low_u64())
    }
}

impl Journaled for InMemoryDepositContract {
    fn checkpoint(&mut self) -> Checkpoint {
        Checkpoint(self.events.len())
    }

    fn commit(&mut self, _checkpoint: Checkpoint) {}

    fn revert(&mut self, checkpoint: Checkpoint) {
        let discarded = self.events.len().saturating_sub(checkpoint.0);
        self.events.truncate(checkpoint.0);
        self.deposit_count -= discarded as u64;
    }
}

impl DepositAuthority for InMemoryDepositContract {
    fn register(&mut self, request: &DepositRequest) -> Result<DepositReceipt, UpstreamError> {
        let amount_gwei = Self::amount_gwei(request.value)?;

        if self.deposit_count >= limits::MAX_DEPOSIT_COUNT {
            return Err(UpstreamError::TreeFull);
        }

        let computed = request_data_root(request, amount_gwei);
        if computed != request.deposit_data_root {
            return Err(UpstreamError::DataRootMismatch {
                supplied: request.deposit_data_root,
                computed,
            });
        }

        let index = self.deposit_count;
        let event = DepositEvent::new(
            request.pubkey,
            request.withdrawal_credentials,
            amount_gwei,
            request.signature,
            index,
        );
        debug!(
            topic = topics::DEPOSIT,
            index,
            amount_gwei,
            pubkey = %event.to_payload().pubkey,
            "Deposit accepted"
        );

        self.events.push(event);
        self.deposit_count += 1;
        Ok(DepositReceipt { index })
    }
}

// =============================================================================
// TESTS
// =============================================================================
