//! # Driving Ports (API - Inbound)
//!
//! The surface callers use to submit batches.

use crate::domain::entities::{BatchSubmission, ProcessingResult};
use crate::domain::value_objects::{Address, U256};
use crate::errors::ForwarderError;

/// Primary API of the batch deposit forwarder.
///
/// Calls against one instance are serialised by `&mut self`; each call
/// either completes in full or leaves no trace.
///
/// ## Usage
///
/// ```ignore
/// let result = forwarder.process(submitter, &submission)?;
/// assert_eq!(result.records_processed, submission.len());
/// ```
pub trait BatchDepositApi {
    /// Validate a batch and forward one deposit per record, atomically.
    ///
    /// # Errors
    ///
    /// * `OperationPaused` - the gate is paused (checked first)
    /// * `BatchSizeInvalid` / `ParametersMismatch` - batch shape
    /// * `AmountOutOfRange` / `InvalidRecordData` - per record
    /// * `ValueMismatch` - supplied value differs from the amounts' sum
    /// * `Upstream` / `Ledger` - a forward failed; the whole batch is rolled back
    fn process(
        &mut self,
        submitter: Address,
        submission: &BatchSubmission,
    ) -> Result<ProcessingResult, ForwarderError>;

    /// Entry point for value sent outside `process`.
    ///
    /// Always fails with `DirectTransferNotAllowed`, with or without calldata.
    fn receive(&self, sender: Address, value: U256, calldata: &[u8]) -> Result<(), ForwarderError>;

    /// The immutable upstream authority address.
    fn upstream_authority(&self) -> Address;

    /// The forwarder's own address.
    fn address(&self) -> Address;
}
