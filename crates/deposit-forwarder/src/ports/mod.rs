//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions for batch deposit forwarding.
//! These are the interfaces between the domain and its collaborators.
//!
//! - **Driving Ports (Inbound)**: `BatchDepositApi`
//! - **Driven Ports (Outbound)**: `AccessControl`, `ValueLedger`,
//!   `DepositAuthority`, `EventSink`
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
