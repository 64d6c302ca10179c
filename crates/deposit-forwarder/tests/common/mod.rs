//! Shared fixtures for the forwarder integration tests.

#![allow(dead_code)]

use deposit_forwarder::prelude::*;
use deposit_forwarder::service::{TEST_FORWARDER, TEST_OWNER, TEST_UPSTREAM};
use std::sync::Arc;

/// Account that submits batches in every test.
pub const SUBMITTER: Address = Address::new([0x5B; 20]);

/// Enough to cover a maximum-size batch of maximum amounts twice over.
pub fn submitter_funds() -> U256 {
    eth_to_wei(2_100_000)
}

/// Record `i` with a distinct pubkey and a correct data root.
pub fn record(i: usize, amount_gwei: u64) -> ValidatorRecord {
    let mut public_key = [0x11; 48];
    public_key[..8].copy_from_slice(&(i as u64).to_be_bytes());

    let mut signature = [0x22; 96];
    signature[88..].copy_from_slice(&(i as u64).to_be_bytes());

    let mut record = ValidatorRecord {
        public_key: PublicKey(public_key),
        withdrawal_credentials: WithdrawalCredentials::for_execution_address(SUBMITTER),
        signature: Signature(signature),
        data_root: Hash::ZERO,
        amount_gwei,
    };
    record.data_root = record_data_root(&record);
    record
}

/// Records with the given amounts (gwei), in order.
pub fn records(amounts_gwei: &[u64]) -> Vec<ValidatorRecord> {
    amounts_gwei
        .iter()
        .enumerate()
        .map(|(i, &amount)| record(i, amount))
        .collect()
}

/// Records of `eth` ETH each.
pub fn uniform_records(n: usize, eth: u64) -> Vec<ValidatorRecord> {
    (0..n).map(|i| record(i, eth_to_gwei(eth))).collect()
}

/// Routes forwarder logs to the test harness; later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("deposit_forwarder=info")
        .with_test_writer()
        .try_init();
}

/// In-memory forwarder with a funded submitter.
pub fn funded_forwarder(config: ForwarderConfig) -> InMemoryForwarder {
    init_test_logging();
    let mut forwarder = create_test_forwarder(config).unwrap();
    forwarder
        .ledger_mut()
        .credit(SUBMITTER, submitter_funds())
        .unwrap();
    forwarder
}

/// Upstream authority that rejects its `fail_at`-th call (1-indexed).
pub struct FailingAuthority {
    pub inner: InMemoryDepositContract,
    pub fail_at: usize,
    pub calls: usize,
}

impl FailingAuthority {
    pub fn new(fail_at: usize) -> Self {
        Self {
            inner: InMemoryDepositContract::new(TEST_UPSTREAM),
            fail_at,
            calls: 0,
        }
    }
}

impl Journaled for FailingAuthority {
    fn checkpoint(&mut self) -> Checkpoint {
        self.inner.checkpoint()
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.inner.commit(checkpoint);
    }

    fn revert(&mut self, checkpoint: Checkpoint) {
        self.inner.revert(checkpoint);
    }
}

impl DepositAuthority for FailingAuthority {
    fn register(&mut self, request: &DepositRequest) -> Result<DepositReceipt, UpstreamError> {
        self.calls += 1;
        if self.calls == self.fail_at {
            return Err(UpstreamError::Rejected(format!(
                "rejected call {}",
                self.calls
            )));
        }
        self.inner.register(request)
    }
}

pub type FailingForwarder =
    BatchDepositForwarder<OwnerGate, FailingAuthority, InMemoryLedger, RecordingEventSink>;

/// Forwarder whose upstream rejects its `fail_at`-th call.
pub fn failing_forwarder(fail_at: usize) -> FailingForwarder {
    init_test_logging();
    let mut ledger = InMemoryLedger::new();
    ledger.credit(SUBMITTER, submitter_funds()).unwrap();
    BatchDepositForwarder::new(
        TEST_FORWARDER,
        ForwarderConfig::new(TEST_UPSTREAM),
        Arc::new(OwnerGate::new(TEST_OWNER).unwrap()),
        FailingAuthority::new(fail_at),
        ledger,
        RecordingEventSink::new(),
    )
    .unwrap()
}
