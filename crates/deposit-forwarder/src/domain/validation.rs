//! # Batch Validation
//!
//! Pure validation and accounting for a `BatchSubmission`.
//!
//! Evaluation order:
//! 1. batch size bound, then parallel array lengths;
//! 2. per record, in input order: amount bounds, then field lengths;
//! 3. aggregate reconciliation, only once every record passed step 2.
//!
//! Nothing here touches value or the upstream authority.

use crate::domain::entities::{BatchSubmission, ValidatedBatch, ValidatorRecord};
use crate::domain::policy::AmountPolicy;
use crate::domain::value_objects::{
    PublicKey, Signature, WithdrawalCredentials, U256, WEI_PER_GWEI,
};
use crate::errors::{ForwarderError, RecordField};

/// Checks `1 <= N <= max_batch_size` and that every array has length `N`.
pub fn check_batch_shape(
    submission: &BatchSubmission,
    max_batch_size: usize,
) -> Result<usize, ForwarderError> {
    let n = submission.len();
    if n == 0 || n > max_batch_size {
        return Err(ForwarderError::BatchSizeInvalid {
            provided: n,
            max: max_batch_size,
        });
    }

    let lengths = [
        submission.withdrawal_credentials.len(),
        submission.signatures.len(),
        submission.deposit_data_roots.len(),
        submission.amounts.len(),
    ];
    if let Some(&provided) = lengths.iter().find(|&&len| len != n) {
        return Err(ForwarderError::ParametersMismatch {
            expected: n,
            provided,
        });
    }

    Ok(n)
}

/// Validates record `index` and builds its typed form.
///
/// An array too short to hold `index` is reported as `ParametersMismatch`,
/// so skipping `check_batch_shape` cannot panic.
pub fn validate_record(
    submission: &BatchSubmission,
    index: usize,
    policy: &AmountPolicy,
) -> Result<ValidatorRecord, ForwarderError> {
    let expected = submission.len().max(index + 1);

    let amount_gwei = *entry(&submission.amounts, index, expected)?;
    policy.check(index, amount_gwei)?;

    let invalid = |field| ForwarderError::InvalidRecordData { index, field };

    let public_key = PublicKey::from_slice(entry(&submission.pubkeys, index, expected)?)
        .ok_or_else(|| invalid(RecordField::PublicKey))?;
    let withdrawal_credentials = WithdrawalCredentials::from_slice(entry(
        &submission.withdrawal_credentials,
        index,
        expected,
    )?)
    .ok_or_else(|| invalid(RecordField::WithdrawalCredentials))?;
    let signature = Signature::from_slice(entry(&submission.signatures, index, expected)?)
        .ok_or_else(|| invalid(RecordField::Signature))?;
    let data_root = *entry(&submission.deposit_data_roots, index, expected)?;

    Ok(ValidatorRecord {
        public_key,
        withdrawal_credentials,
        signature,
        data_root,
        amount_gwei,
    })
}

fn entry<T>(values: &[T], index: usize, expected: usize) -> Result<&T, ForwarderError> {
    values.get(index).ok_or(ForwarderError::ParametersMismatch {
        expected,
        provided: values.len(),
    })
}

/// Sum of the record amounts in wei.
///
/// Cannot overflow: at most `usize::MAX <= 2^64` records of at most
/// `2^64 - 1` gwei each keep the `u128` gwei sum below `2^128`, and
/// multiplying by `10^9 < 2^30` stays below `2^158`, well inside `U256`.
#[must_use]
pub fn expected_total_wei(records: &[ValidatorRecord]) -> U256 {
    let total_gwei: u128 = records.iter().map(|r| u128::from(r.amount_gwei)).sum();
    U256::from(total_gwei) * U256::from(WEI_PER_GWEI)
}

/// Compares the attached value with the expected total.
pub fn reconcile(supplied: U256, expected: U256) -> Result<(), ForwarderError> {
    if supplied != expected {
        return Err(ForwarderError::ValueMismatch { supplied, expected });
    }
    Ok(())
}

/// Runs every check and returns the typed batch.
pub fn validate_batch(
    submission: &BatchSubmission,
    max_batch_size: usize,
    policy: &AmountPolicy,
) -> Result<ValidatedBatch, ForwarderError> {
    let n = check_batch_shape(submission, max_batch_size)?;

    let records = (0..n)
        .map(|index| validate_record(submission, index, policy))
        .collect::<Result<Vec<_>, _>>()?;

    let expected = expected_total_wei(&records);
    reconcile(submission.supplied_value, expected)?;

    Ok(ValidatedBatch::new(records, expected))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariants::limits;
    use crate::domain::value_objects::{eth_to_gwei, eth_to_wei, Hash};
    use crate::errors::AmountBound;

    fn submission(amounts_eth: &[u64]) -> BatchSubmission {
        let n = amounts_eth.len();
        BatchSubmission {
            pubkeys: vec![vec![0xAA; 48]; n],
            withdrawal_credentials: vec![vec![0x00; 32]; n],
            signatures: vec![vec![0xBB; 96]; n],
            deposit_data_roots: vec![Hash::ZERO; n],
            amounts: amounts_eth.iter().map(|&e| eth_to_gwei(e)).collect(),
            supplied_value: eth_to_wei(amounts_eth.iter().sum()),
        }
    }

    fn validate(s: &BatchSubmission) -> Result<ValidatedBatch, ForwarderError> {
        validate_batch(s, limits::MAX_BATCH_SIZE, &AmountPolicy::variable())
    }

    #[test]
    fn test_valid_batch() {
        let batch = validate(&submission(&[32, 35, 40])).unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.total_value(), eth_to_wei(107));
        assert_eq!(batch.records()[1].amount_gwei, eth_to_gwei(35));
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = validate(&submission(&[])).unwrap_err();
        assert_eq!(
            err,
            ForwarderError::BatchSizeInvalid {
                provided: 0,
                max: limits::MAX_BATCH_SIZE
            }
        );
    }

    #[test]
    fn test_batch_size_bound() {
        let at_max = submission(&[1; 4]);
        assert!(validate_batch(&at_max, 4, &AmountPolicy::variable()).is_ok());

        let over = submission(&[1; 5]);
        let err = validate_batch(&over, 4, &AmountPolicy::variable()).unwrap_err();
        assert_eq!(err, ForwarderError::BatchSizeInvalid { provided: 5, max: 4 });
    }

    #[test]
    fn test_parameters_mismatch_reports_first_bad_length() {
        let mut s = submission(&[32, 32]);
        s.signatures.pop();
        s.amounts.push(1);
        let err = validate(&s).unwrap_err();
        assert_eq!(
            err,
            ForwarderError::ParametersMismatch {
                expected: 2,
                provided: 1
            }
        );

        let mut s = submission(&[32, 32]);
        s.deposit_data_roots.push(Hash::ZERO);
        let err = validate(&s).unwrap_err();
        assert_eq!(
            err,
            ForwarderError::ParametersMismatch {
                expected: 2,
                provided: 3
            }
        );
    }

    #[test]
    fn test_validate_record_on_short_arrays_reports_mismatch() {
        let policy = AmountPolicy::default();

        let mut s = submission(&[32, 32]);
        s.signatures.pop();
        assert_eq!(
            validate_record(&s, 1, &policy).unwrap_err(),
            ForwarderError::ParametersMismatch {
                expected: 2,
                provided: 1
            }
        );
        assert!(validate_record(&s, 0, &policy).is_ok());

        let s = submission(&[32]);
        assert_eq!(
            validate_record(&s, 3, &policy).unwrap_err(),
            ForwarderError::ParametersMismatch {
                expected: 4,
                provided: 1
            }
        );
    }

    #[test]
    fn test_invalid_pubkey_length() {
        let mut s = submission(&[32, 40]);
        s.pubkeys[1] = vec![0xAA; 47];
        let err = validate(&s).unwrap_err();
        assert_eq!(
            err,
            ForwarderError::InvalidRecordData {
                index: 1,
                field: RecordField::PublicKey
            }
        );
    }

    #[test]
    fn test_invalid_credentials_and_signature_length() {
        let mut s = submission(&[32]);
        s.withdrawal_credentials[0] = vec![0x01; 20];
        assert_eq!(
            validate(&s).unwrap_err(),
            ForwarderError::InvalidRecordData {
                index: 0,
                field: RecordField::WithdrawalCredentials
            }
        );

        let mut s = submission(&[32]);
        s.signatures[0] = vec![0xBB; 97];
        assert_eq!(
            validate(&s).unwrap_err(),
            ForwarderError::InvalidRecordData {
                index: 0,
                field: RecordField::Signature
            }
        );
    }

    #[test]
    fn test_amount_checked_before_lengths() {
        let mut s = submission(&[32]);
        s.pubkeys[0] = vec![0xAA; 10];
        s.amounts[0] = 0;
        let err = validate(&s).unwrap_err();
        assert!(matches!(
            err,
            ForwarderError::AmountOutOfRange {
                index: 0,
                bound: AmountBound::Minimum(_),
                ..
            }
        ));
    }

    #[test]
    fn test_earlier_record_reported_first() {
        let mut s = submission(&[32, 32]);
        s.pubkeys[0] = vec![0xAA; 47];
        s.amounts[1] = eth_to_gwei(4096);
        let err = validate(&s).unwrap_err();
        assert_eq!(
            err,
            ForwarderError::InvalidRecordData {
                index: 0,
                field: RecordField::PublicKey
            }
        );
    }

    #[test]
    fn test_amount_reported_before_value_mismatch() {
        let mut s = submission(&[32, 32]);
        s.amounts[1] = eth_to_gwei(3000);
        s.supplied_value = eth_to_wei(1);
        let err = validate(&s).unwrap_err();
        assert!(matches!(
            err,
            ForwarderError::AmountOutOfRange {
                index: 1,
                bound: AmountBound::Maximum(_),
                ..
            }
        ));
    }

    #[test]
    fn test_value_mismatch() {
        let mut s = submission(&[32, 40]);
        s.supplied_value = eth_to_wei(73);
        assert_eq!(
            validate(&s).unwrap_err(),
            ForwarderError::ValueMismatch {
                supplied: eth_to_wei(73),
                expected: eth_to_wei(72)
            }
        );
    }

    #[test]
    fn test_value_off_by_one_wei() {
        let mut s = submission(&[32]);
        s.supplied_value = eth_to_wei(32) + 1;
        assert!(matches!(
            validate(&s),
            Err(ForwarderError::ValueMismatch { .. })
        ));

        s.supplied_value = eth_to_wei(32) - 1;
        assert!(matches!(
            validate(&s),
            Err(ForwarderError::ValueMismatch { .. })
        ));
    }

    #[test]
    fn test_expected_total_no_overflow_at_extremes() {
        let record = ValidatorRecord {
            public_key: PublicKey([0; 48]),
            withdrawal_credentials: WithdrawalCredentials([0; 32]),
            signature: Signature([0; 96]),
            data_root: Hash::ZERO,
            amount_gwei: u64::MAX,
        };
        let records = vec![record; 1000];
        let expected =
            U256::from(u64::MAX) * U256::from(1000u64) * U256::from(WEI_PER_GWEI);
        assert_eq!(expected_total_wei(&records), expected);
    }
}
