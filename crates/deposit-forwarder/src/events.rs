//! # Event Schema
//!
//! Events observable outside a `process` call:
//!
//! | Event | Emitted by | When |
//! |-------|-----------|------|
//! | `BatchProcessed` | forwarder | once per successful batch, after commit |
//! | `DepositEvent` | upstream authority | once per accepted record |
//!
//! The upstream event encodes `amount` (gwei) and `index` as 8-byte
//! little-endian integers; log consumers decode them with
//! `DepositEventPayload::decode_amount` / `decode_index`.

use crate::domain::deposit_data::{from_little_endian_64, to_little_endian_64};
use crate::domain::value_objects::{Address, PublicKey, Signature, WithdrawalCredentials, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// FORWARDER EVENTS
// =============================================================================

/// Summary of a successful batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProcessedPayload {
    /// Correlation ID of the call.
    pub batch_id: Uuid,
    /// Caller that supplied the batch.
    pub submitter: Address,
    /// Number of records forwarded.
    pub records_processed: usize,
    /// Total forwarded, in wei.
    pub total_forwarded_value: U256,
}

/// Events published by the forwarder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForwarderEvent {
    /// A batch was forwarded in full.
    BatchProcessed(BatchProcessedPayload),
}

impl ForwarderEvent {
    /// Topic the event is published under.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::BatchProcessed(_) => topics::BATCH_PROCESSED,
        }
    }
}

// =============================================================================
// UPSTREAM DEPOSIT EVENT
// =============================================================================

/// Registration event recorded by the upstream authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositEvent {
    /// Validator public key.
    pub pubkey: PublicKey,
    /// Withdrawal credentials.
    pub withdrawal_credentials: WithdrawalCredentials,
    /// Amount in gwei, little-endian.
    pub amount: [u8; 8],
    /// Signature.
    pub signature: Signature,
    /// Registration index, little-endian.
    pub index: [u8; 8],
}

impl DepositEvent {
    /// Builds the event for an accepted deposit.
    #[must_use]
    pub const fn new(
        pubkey: PublicKey,
        withdrawal_credentials: WithdrawalCredentials,
        amount_gwei: u64,
        signature: Signature,
        index: u64,
    ) -> Self {
        Self {
            pubkey,
            withdrawal_credentials,
            amount: to_little_endian_64(amount_gwei),
            signature,
            index: to_little_endian_64(index),
        }
    }

    /// Decoded amount in gwei.
    #[must_use]
    pub const fn amount_gwei(&self) -> u64 {
        from_little_endian_64(self.amount)
    }

    /// Decoded registration index.
    #[must_use]
    pub const fn deposit_index(&self) -> u64 {
        from_little_endian_64(self.index)
    }

    /// Hex-encoded form for log consumers.
    #[must_use]
    pub fn to_payload(&self) -> DepositEventPayload {
        DepositEventPayload {
            pubkey: encode_hex(self.pubkey.as_bytes()),
            withdrawal_credentials: encode_hex(self.withdrawal_credentials.as_bytes()),
            amount: encode_hex(&self.amount),
            signature: encode_hex(self.signature.as_bytes()),
            index: encode_hex(&self.index),
        }
    }
}

/// Wire form of `DepositEvent`: every field 0x-prefixed hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositEventPayload {
    /// 48-byte public key.
    pub pubkey: String,
    /// 32-byte withdrawal credentials.
    pub withdrawal_credentials: String,
    /// 8-byte little-endian amount (gwei).
    pub amount: String,
    /// 96-byte signature.
    pub signature: String,
    /// 8-byte little-endian index.
    pub index: String,
}

impl DepositEventPayload {
    /// Decodes the little-endian amount field.
    #[must_use]
    pub fn decode_amount(&self) -> Option<u64> {
        decode_le_64(&self.amount)
    }

    /// Decodes the little-endian index field.
    #[must_use]
    pub fn decode_index(&self) -> Option<u64> {
        decode_le_64(&self.index)
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn decode_le_64(field: &str) -> Option<u64> {
    let digits = field.strip_prefix("0x").unwrap_or(field);
    let bytes = hex::decode(digits).ok()?;
    let array = <[u8; 8]>::try_from(bytes.as_slice()).ok()?;
    Some(from_little_endian_64(array))
}

// =============================================================================
// EVENT TOPICS
// =============================================================================

/// Topics events are published under.
pub mod topics {
    /// Successful batch summaries.
    pub const BATCH_PROCESSED: &str = "deposit_forwarder.batch.processed";

    /// Upstream registration events.
    pub const DEPOSIT: &str = "deposit_authority.deposit";
}

// =============================================================================
// TESTS
// =============================================================================
