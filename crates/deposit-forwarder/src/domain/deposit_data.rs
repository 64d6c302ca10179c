//! # Deposit Data
//!
//! SHA-256 hash tree root of a deposit, as reconstructed by the upstream
//! authority to check the caller-supplied `deposit_data_root`, and the
//! little-endian encodings used in its registration event.

use crate::domain::entities::{DepositRequest, ValidatorRecord};
use crate::domain::value_objects::{Hash, PublicKey, Signature, WithdrawalCredentials};
use sha2::{Digest, Sha256};

/// Encodes a `u64` as 8 little-endian bytes.
#[must_use]
pub const fn to_little_endian_64(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

/// Decodes 8 little-endian bytes into a `u64`.
#[must_use]
pub const fn from_little_endian_64(bytes: [u8; 8]) -> u64 {
    u64::from_le_bytes(bytes)
}

fn sha256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hash tree root of `DepositData { pubkey, withdrawal_credentials, amount, signature }`.
#[must_use]
pub fn compute_deposit_data_root(
    pubkey: &PublicKey,
    withdrawal_credentials: &WithdrawalCredentials,
    amount_gwei: u64,
    signature: &Signature,
) -> Hash {
    let sig = signature.as_bytes();

    let pubkey_root = sha256(&[pubkey.as_bytes(), &[0u8; 16]]);
    let signature_root = sha256(&[
        &sha256(&[&sig[..64]]),
        &sha256(&[&sig[64..], &[0u8; 32]]),
    ]);

    let amount = to_little_endian_64(amount_gwei);
    let node = sha256(&[
        &sha256(&[&pubkey_root, withdrawal_credentials.as_bytes()]),
        &sha256(&[&amount, &[0u8; 24], &signature_root]),
    ]);

    Hash::new(node)
}

/// Data root a record should carry for its own fields.
#[must_use]
pub fn record_data_root(record: &ValidatorRecord) -> Hash {
    compute_deposit_data_root(
        &record.public_key,
        &record.withdrawal_credentials,
        record.amount_gwei,
        &record.signature,
    )
}

/// Data root of an upstream request for the given gwei amount.
#[must_use]
pub fn request_data_root(request: &DepositRequest, amount_gwei: u64) -> Hash {
    compute_deposit_data_root(
        &request.pubkey,
        &request.withdrawal_credentials,
        amount_gwei,
        &request.signature,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::eth_to_gwei;

    fn fields() -> (PublicKey, WithdrawalCredentials, Signature) {
        (
            PublicKey([0x11; 48]),
            WithdrawalCredentials([0x00; 32]),
            Signature([0x22; 96]),
        )
    }

    #[test]
    fn test_little_endian_encoding() {
        let encoded = to_little_endian_64(32_000_000_000);
        assert_eq!(encoded, [0x00, 0x40, 0x59, 0x73, 0x07, 0x00, 0x00, 0x00]);
        assert_eq!(from_little_endian_64(encoded), 32_000_000_000);
        assert_eq!(to_little_endian_64(1), [1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_root_is_deterministic() {
        let (pk, wc, sig) = fields();
        let a = compute_deposit_data_root(&pk, &wc, eth_to_gwei(32), &sig);
        let b = compute_deposit_data_root(&pk, &wc, eth_to_gwei(32), &sig);
        assert_eq!(a, b);
        assert_ne!(a, Hash::ZERO);
    }

    #[test]
    fn test_root_binds_every_field() {
        let (pk, wc, sig) = fields();
        let base = compute_deposit_data_root(&pk, &wc, eth_to_gwei(32), &sig);

        assert_ne!(
            base,
            compute_deposit_data_root(&PublicKey([0x12; 48]), &wc, eth_to_gwei(32), &sig)
        );
        assert_ne!(
            base,
            compute_deposit_data_root(&pk, &WithdrawalCredentials([0x01; 32]), eth_to_gwei(32), &sig)
        );
        assert_ne!(base, compute_deposit_data_root(&pk, &wc, eth_to_gwei(33), &sig));

        let mut tail = sig;
        tail.0[95] ^= 0xFF;
        assert_ne!(base, compute_deposit_data_root(&pk, &wc, eth_to_gwei(32), &tail));
    }

    #[test]
    fn test_record_and_request_roots_agree() {
        let (pk, wc, sig) = fields();
        let mut record = ValidatorRecord {
            public_key: pk,
            withdrawal_credentials: wc,
            signature: sig,
            data_root: Hash::ZERO,
            amount_gwei: eth_to_gwei(40),
        };
        record.data_root = record_data_root(&record);

        let request = record.to_request();
        assert_eq!(request_data_root(&request, record.amount_gwei), record.data_root);
    }
}
