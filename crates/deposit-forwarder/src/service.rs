//! # Batch Deposit Forwarder Service
//!
//! Orchestrates one `process` call:
//!
//! 1. gate check (`OperationPaused`), before anything else
//! 2. pure validation and accounting (`domain::validation`)
//! 3. checkpoint ledger and authority, pull `supplied_value` from the submitter
//! 4. forward record by record, in input order
//! 5. check post-forwarding invariants, commit, emit `BatchProcessed`
//!
//! Any failure after step 3 reverts both journals to their checkpoints and
//! surfaces the error unchanged.

use crate::adapters::{InMemoryDepositContract, InMemoryLedger, OwnerGate, RecordingEventSink};
use crate::config::ForwarderConfig;
use crate::domain::entities::{
    BatchSubmission, DepositReceipt, DepositRequest, ProcessingResult, ValidatedBatch,
};
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::validation::validate_batch;
use crate::domain::value_objects::{Address, U256, WEI_PER_GWEI};
use crate::errors::ForwarderError;
use crate::events::{BatchProcessedPayload, ForwarderEvent};
use crate::ports::inbound::BatchDepositApi;
use crate::ports::outbound::{AccessControl, DepositAuthority, EventSink, Journaled, ValueLedger};

use deposit_telemetry::{record_batch_processed, record_batch_rejected};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

/// Statistics for the forwarder.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Batches forwarded in full.
    pub batches_processed: u64,
    /// Batches rejected or rolled back.
    pub batches_rejected: u64,
    /// Records forwarded upstream.
    pub records_forwarded: u64,
    /// Wei forwarded upstream.
    pub value_forwarded: U256,
    /// Bare value transfers refused.
    pub direct_transfers_rejected: u64,
}

/// The batch deposit forwarder.
///
/// Holds no value between calls: everything pulled from the submitter in a
/// call is pushed to the upstream authority in the same call, or the call
/// is rolled back.
pub struct BatchDepositForwarder<G, D, L, E>
where
    G: AccessControl,
    D: DepositAuthority,
    L: ValueLedger,
    E: EventSink,
{
    config: ForwarderConfig,
    /// The forwarder's own account on the ledger.
    address: Address,
    /// Copied out of `config` at construction; never reassigned.
    upstream: Address,
    gate: Arc<G>,
    authority: D,
    ledger: L,
    events: E,
    stats: Mutex<ServiceStats>,
}

impl<G, D, L, E> BatchDepositForwarder<G, D, L, E>
where
    G: AccessControl,
    D: DepositAuthority,
    L: ValueLedger,
    E: EventSink,
{
    /// Create a forwarder living at `address`.
    ///
    /// # Errors
    ///
    /// * `ZeroAddress` - `config.upstream_authority` is unset
    /// * `Config` - the batch size bound or amount policy is invalid
    pub fn new(
        address: Address,
        config: ForwarderConfig,
        gate: Arc<G>,
        authority: D,
        ledger: L,
        events: E,
    ) -> Result<Self, ForwarderError> {
        if config.upstream_authority.is_zero() {
            return Err(ForwarderError::ZeroAddress);
        }
        config.validate()?;

        info!(
            forwarder = %address,
            upstream = %config.upstream_authority,
            max_batch_size = config.max_batch_size,
            min_gwei = config.amount_policy.min_gwei,
            max_gwei = config.amount_policy.max_gwei,
            "Batch deposit forwarder created"
        );

        Ok(Self {
            upstream: config.upstream_authority,
            config,
            address,
            gate,
            authority,
            ledger,
            events,
            stats: Mutex::new(ServiceStats::default()),
        })
    }

    /// Get current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    /// Active configuration.
    pub fn config(&self) -> &ForwarderConfig {
        &self.config
    }

    /// Handle to the access-control gate.
    pub fn gate(&self) -> &Arc<G> {
        &self.gate
    }

    /// The upstream authority adapter.
    pub fn authority(&self) -> &D {
        &self.authority
    }

    /// The value ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable ledger access, for funding accounts in simulations.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    /// The event sink.
    pub fn events(&self) -> &E {
        &self.events
    }

    fn process_batch(
        &mut self,
        batch_id: Uuid,
        submitter: Address,
        submission: &BatchSubmission,
    ) -> Result<ProcessingResult, ForwarderError> {
        if self.gate.is_paused() {
            return Err(ForwarderError::OperationPaused);
        }

        let batch = validate_batch(
            submission,
            self.config.max_batch_size,
            &self.config.amount_policy,
        )?;
        debug!(
            records = batch.len(),
            total_value = %batch.total_value(),
            "Batch validated"
        );

        let ledger_checkpoint = self.ledger.checkpoint();
        let authority_checkpoint = self.authority.checkpoint();

        if let Err(e) = self.forward_all(submitter, &batch) {
            self.authority.revert(authority_checkpoint);
            self.ledger.revert(ledger_checkpoint);
            debug!(error = %e, "Batch rolled back");
            return Err(e);
        }

        self.authority.commit(authority_checkpoint);
        self.ledger.commit(ledger_checkpoint);

        let result = ProcessingResult {
            batch_id,
            submitter,
            records_processed: batch.len(),
            total_forwarded_value: batch.total_value(),
        };
        self.events.emit(ForwarderEvent::BatchProcessed(BatchProcessedPayload {
            batch_id,
            submitter,
            records_processed: result.records_processed,
            total_forwarded_value: result.total_forwarded_value,
        }));

        Ok(result)
    }

    /// Moves the value in, forwards every record, then checks invariants.
    /// Leaves the journals dirty on error; the caller reverts.
    fn forward_all(
        &mut self,
        submitter: Address,
        batch: &ValidatedBatch,
    ) -> Result<(), ForwarderError> {
        self.ledger
            .transfer(submitter, self.address, batch.total_value())?;

        let mut forwards: Vec<DepositRequest> = Vec::with_capacity(batch.len());
        let mut receipts: Vec<DepositReceipt> = Vec::with_capacity(batch.len());

        for (index, record) in batch.records().iter().enumerate() {
            let request = record.to_request();
            self.ledger
                .transfer(self.address, self.upstream, request.value)?;

            let receipt = self.authority.register(&request).map_err(|e| {
                warn!(index, error = %e, "Upstream rejected deposit");
                e
            })?;
            debug!(
                index,
                deposit_index = receipt.index,
                amount_gwei = record.amount_gwei,
                "Deposit forwarded"
            );

            forwards.push(request);
            receipts.push(receipt);
        }

        match check_all_invariants(
            self.ledger.balance_of(self.address),
            batch.total_value(),
            batch.records(),
            &forwards,
            &receipts,
        ) {
            InvariantCheckResult::Valid => Ok(()),
            InvariantCheckResult::Invalid(violations) => {
                error!(?violations, "Post-forwarding invariant violated");
                violations
                    .into_iter()
                    .next()
                    .map_or(Ok(()), |first| Err(ForwarderError::InvariantViolated(first)))
            }
        }
    }
}

impl<G, D, L, E> BatchDepositApi for BatchDepositForwarder<G, D, L, E>
where
    G: AccessControl,
    D: DepositAuthority,
    L: ValueLedger,
    E: EventSink,
{
    #[instrument(
        skip(self, submission),
        fields(submitter = %submitter, records = submission.len(), batch_id)
    )]
    fn process(
        &mut self,
        submitter: Address,
        submission: &BatchSubmission,
    ) -> Result<ProcessingResult, ForwarderError> {
        let start = Instant::now();
        let batch_id = Uuid::new_v4();
        Span::current().record("batch_id", tracing::field::display(batch_id));

        let outcome = self.process_batch(batch_id, submitter, submission);
        let elapsed = start.elapsed();

        let mut stats = self.stats.lock();
        match &outcome {
            Ok(result) => {
                let value_gwei = (result.total_forwarded_value / U256::from(WEI_PER_GWEI)).low_u128();
                stats.batches_processed += 1;
                stats.records_forwarded += result.records_processed as u64;
                stats.value_forwarded = stats
                    .value_forwarded
                    .saturating_add(result.total_forwarded_value);
                record_batch_processed(result.records_processed, value_gwei, elapsed);

                info!(
                    records = result.records_processed,
                    total_value = %result.total_forwarded_value,
                    ?elapsed,
                    "Batch processed"
                );
            }
            Err(e) => {
                stats.batches_rejected += 1;
                record_batch_rejected(e.kind(), elapsed);
                if e.is_validation_error() {
                    debug!(kind = e.kind(), error = %e, "Batch rejected before value moved");
                } else {
                    warn!(kind = e.kind(), error = %e, "Batch rejected, forwards reverted");
                }
            }
        }

        outcome
    }

    fn receive(&self, sender: Address, value: U256, calldata: &[u8]) -> Result<(), ForwarderError> {
        self.stats.lock().direct_transfers_rejected += 1;
        warn!(
            sender = %sender,
            value = %value,
            calldata_len = calldata.len(),
            "Direct transfer rejected"
        );
        Err(ForwarderError::DirectTransferNotAllowed)
    }

    fn upstream_authority(&self) -> Address {
        self.upstream
    }

    fn address(&self) -> Address {
        self.address
    }
}

// =============================================================================
// TEST FIXTURES
// =============================================================================

/// Forwarder wired to the in-memory adapters.
pub type InMemoryForwarder =
    BatchDepositForwarder<OwnerGate, InMemoryDepositContract, InMemoryLedger, RecordingEventSink>;

/// Owner of the gate built by `create_test_forwarder`.
pub const TEST_OWNER: Address = Address::new([0x0A; 20]);
/// Address of the forwarder built by `create_test_forwarder`.
pub const TEST_FORWARDER: Address = Address::new([0xF0; 20]);
/// Upstream authority used by `create_test_forwarder`.
pub const TEST_UPSTREAM: Address = Address::new([0xDE; 20]);

/// Create a forwarder with in-memory adapters (for testing).
pub fn create_test_forwarder(config: ForwarderConfig) -> Result<InMemoryForwarder, ForwarderError> {
    let config = ForwarderConfig {
        upstream_authority: TEST_UPSTREAM,
        ..config
    };
    let gate = OwnerGate::new(TEST_OWNER).map_err(|_| ForwarderError::ZeroAddress)?;
    BatchDepositForwarder::new(
        TEST_FORWARDER,
        config,
        Arc::new(gate),
        InMemoryDepositContract::new(TEST_UPSTREAM),
        InMemoryLedger::new(),
        RecordingEventSink::new(),
    )
}

// =============================================================================
// TESTS
// =============================================================================
