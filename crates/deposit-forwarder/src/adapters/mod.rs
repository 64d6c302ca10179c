//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the driven ports.
//!
//! - `OwnerGate` implements `AccessControl`
//! - `InMemoryLedger` implements `ValueLedger`
//! - `InMemoryDepositContract` implements `DepositAuthority`
//! - `RecordingEventSink` / `TracingEventSink` implement `EventSink`

pub mod access_control;
pub mod deposit_contract;
pub mod event_sink;
pub mod ledger;

pub use access_control::*;
pub use deposit_contract::*;
pub use event_sink::*;
pub use ledger::*;
