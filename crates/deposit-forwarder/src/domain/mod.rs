//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic for batch deposit forwarding.
//! NO I/O, NO value movement, NO logging.
//!
//! - Dependencies point INWARD only (adapters and service depend on this).
//! - Everything here is deterministic and unit-testable in isolation.

pub mod deposit_data;
pub mod entities;
pub mod invariants;
pub mod policy;
pub mod validation;
pub mod value_objects;

pub use deposit_data::*;
pub use entities::*;
pub use invariants::*;
pub use policy::*;
pub use validation::*;
pub use value_objects::*;
