//! # Core Domain Entities
//!
//! The batch as submitted (parallel arrays, unchecked lengths), the typed
//! records it is turned into, and the result of a successful call.
//! None of these outlive a single `process` invocation.

use crate::domain::value_objects::{
    gwei_to_wei, Address, Hash, PublicKey, Signature, WithdrawalCredentials, U256,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// BATCH SUBMISSION (boundary input)
// =============================================================================

/// A caller-supplied batch as it arrives on the wire.
///
/// The five vectors are index-aligned; nothing about their lengths is
/// trusted until `validation::validate_batch` has run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSubmission {
    /// Validator public keys (expected 48 bytes each).
    pub pubkeys: Vec<Vec<u8>>,
    /// Withdrawal credentials (expected 32 bytes each).
    pub withdrawal_credentials: Vec<Vec<u8>>,
    /// Signatures (expected 96 bytes each).
    pub signatures: Vec<Vec<u8>>,
    /// Deposit data roots, checked by the upstream authority.
    pub deposit_data_roots: Vec<Hash>,
    /// Per-record amounts in gwei.
    pub amounts: Vec<u64>,
    /// Attached payment in wei.
    pub supplied_value: U256,
}

impl BatchSubmission {
    /// Creates an empty submission with the given attached value.
    #[must_use]
    pub fn new(supplied_value: U256) -> Self {
        Self {
            supplied_value,
            ..Self::default()
        }
    }

    /// Appends a typed record to every parallel array.
    pub fn push_record(&mut self, record: &ValidatorRecord) {
        self.pubkeys.push(record.public_key.as_bytes().to_vec());
        self.withdrawal_credentials
            .push(record.withdrawal_credentials.as_bytes().to_vec());
        self.signatures.push(record.signature.as_bytes().to_vec());
        self.deposit_data_roots.push(record.data_root);
        self.amounts.push(record.amount_gwei);
    }

    /// Builds a submission from typed records, attaching exactly their sum.
    #[must_use]
    pub fn from_records(records: &[ValidatorRecord]) -> Self {
        let supplied = records
            .iter()
            .fold(U256::zero(), |acc, r| acc + r.amount_wei());
        let mut submission = Self::new(supplied);
        for record in records {
            submission.push_record(record);
        }
        submission
    }

    /// Number of records, as determined by the pubkey array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pubkeys.len()
    }

    /// Returns true if no pubkeys were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pubkeys.is_empty()
    }
}

// =============================================================================
// VALIDATOR RECORD
// =============================================================================

/// One structurally valid validator registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatorRecord {
    /// Validator being registered.
    pub public_key: PublicKey,
    /// Where withdrawals route.
    pub withdrawal_credentials: WithdrawalCredentials,
    /// Proof of possession (length-checked only).
    pub signature: Signature,
    /// Integrity checksum verified upstream.
    pub data_root: Hash,
    /// Amount in gwei.
    pub amount_gwei: u64,
}

impl ValidatorRecord {
    /// Amount in wei, the payment attached to this record's forward.
    #[must_use]
    pub fn amount_wei(&self) -> U256 {
        gwei_to_wei(self.amount_gwei)
    }

    /// The upstream call for this record.
    #[must_use]
    pub fn to_request(&self) -> DepositRequest {
        DepositRequest {
            pubkey: self.public_key,
            withdrawal_credentials: self.withdrawal_credentials,
            signature: self.signature,
            deposit_data_root: self.data_root,
            value: self.amount_wei(),
        }
    }
}

// =============================================================================
// VALIDATED BATCH
// =============================================================================

/// A batch that passed every structural, bounds and accounting check.
///
/// Only `validation::validate_batch` constructs one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedBatch {
    records: Vec<ValidatorRecord>,
    total_value: U256,
}

impl ValidatedBatch {
    pub(crate) fn new(records: Vec<ValidatorRecord>, total_value: U256) -> Self {
        Self {
            records,
            total_value,
        }
    }

    /// Records in input order.
    #[must_use]
    pub fn records(&self) -> &[ValidatorRecord] {
        &self.records
    }

    /// Reconciled total in wei (equals the supplied value).
    #[must_use]
    pub fn total_value(&self) -> U256 {
        self.total_value
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a validated batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// UPSTREAM CALL
// =============================================================================

/// A single `register` call to the upstream authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositRequest {
    /// Validator public key.
    pub pubkey: PublicKey,
    /// Withdrawal credentials.
    pub withdrawal_credentials: WithdrawalCredentials,
    /// Signature.
    pub signature: Signature,
    /// Deposit data root.
    pub deposit_data_root: Hash,
    /// Attached payment in wei.
    pub value: U256,
}

/// Acknowledgement from the upstream authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositReceipt {
    /// Sequential registration index assigned upstream.
    pub index: u64,
}

// =============================================================================
// PROCESSING RESULT
// =============================================================================

/// Outcome of a successful `process` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// Correlation ID of the call.
    pub batch_id: Uuid,
    /// Caller that supplied the batch and its value.
    pub submitter: Address,
    /// Number of records forwarded.
    pub records_processed: usize,
    /// Total wei forwarded upstream.
    pub total_forwarded_value: U256,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::eth_to_gwei;

    fn record(seed: u8, eth: u64) -> ValidatorRecord {
        ValidatorRecord {
            public_key: PublicKey([seed; 48]),
            withdrawal_credentials: WithdrawalCredentials([0u8; 32]),
            signature: Signature([seed; 96]),
            data_root: Hash::new([seed; 32]),
            amount_gwei: eth_to_gwei(eth),
        }
    }

    #[test]
    fn test_from_records_aligns_arrays() {
        let records = [record(1, 32), record(2, 35)];
        let submission = BatchSubmission::from_records(&records);

        assert_eq!(submission.len(), 2);
        assert_eq!(submission.withdrawal_credentials.len(), 2);
        assert_eq!(submission.signatures.len(), 2);
        assert_eq!(submission.deposit_data_roots.len(), 2);
        assert_eq!(submission.amounts, vec![eth_to_gwei(32), eth_to_gwei(35)]);
        assert_eq!(submission.pubkeys[1], vec![2u8; 48]);
        assert_eq!(
            submission.supplied_value,
            records[0].amount_wei() + records[1].amount_wei()
        );
    }

    #[test]
    fn test_record_to_request() {
        let r = record(7, 40);
        let request = r.to_request();
        assert_eq!(request.pubkey, r.public_key);
        assert_eq!(request.deposit_data_root, r.data_root);
        assert_eq!(request.value, r.amount_wei());
    }

    #[test]
    fn test_empty_submission() {
        let submission = BatchSubmission::new(U256::zero());
        assert!(submission.is_empty());
        assert_eq!(submission.len(), 0);
    }
}
