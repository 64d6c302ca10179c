//! # Owner Gate
//!
//! Owner-controlled pause switch shared between the forwarder and its
//! operator. The forwarder only reads it through `AccessControl`; every
//! mutation here requires the caller to be the current owner.

use crate::domain::value_objects::Address;
use crate::errors::AccessError;
use crate::ports::outbound::AccessControl;
use parking_lot::RwLock;
use tracing::{info, warn};

#[derive(Debug)]
struct GateState {
    owner: Address,
    paused: bool,
}

/// Single-owner pause gate.
///
/// After `renounce_ownership` the owner is `Address::ZERO` and the gate can
/// no longer be changed.
#[derive(Debug)]
pub struct OwnerGate {
    state: RwLock<GateState>,
}

impl OwnerGate {
    /// Creates an unpaused gate owned by `owner`.
    pub fn new(owner: Address) -> Result<Self, AccessError> {
        if owner.is_zero() {
            return Err(AccessError::InvalidOwner);
        }
        Ok(Self {
            state: RwLock::new(GateState {
                owner,
                paused: false,
            }),
        })
    }

    /// Stops `process` from running.
    pub fn pause(&self, caller: Address) -> Result<(), AccessError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;
        if state.paused {
            return Err(AccessError::AlreadyPaused);
        }
        state.paused = true;
        info!(owner = %caller, "Forwarder paused");
        Ok(())
    }

    /// Lets `process` run again.
    pub fn unpause(&self, caller: Address) -> Result<(), AccessError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;
        if !state.paused {
            return Err(AccessError::NotPaused);
        }
        state.paused = false;
        info!(owner = %caller, "Forwarder unpaused");
        Ok(())
    }

    /// Hands the gate to `new_owner`.
    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<(), AccessError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;
        if new_owner.is_zero() {
            return Err(AccessError::InvalidOwner);
        }
        state.owner = new_owner;
        info!(previous = %caller, new_owner = %new_owner, "Ownership transferred");
        Ok(())
    }

    /// Gives up ownership for good, freezing the pause flag as it is.
    pub fn renounce_ownership(&self, caller: Address) -> Result<(), AccessError> {
        let mut state = self.state.write();
        Self::ensure_owner(&state, caller)?;
        state.owner = Address::ZERO;
        warn!(previous = %caller, paused = state.paused, "Ownership renounced");
        Ok(())
    }

    fn ensure_owner(state: &GateState, caller: Address) -> Result<(), AccessError> {
        if state.owner.is_zero() || state.owner != caller {
            warn!(caller = %caller, "Rejected gate mutation from non-owner");
            return Err(AccessError::Unauthorized { caller });
        }
        Ok(())
    }
}

impl AccessControl for OwnerGate {
    fn is_paused(&self) -> bool {
        self.state.read().paused
    }

    fn current_owner(&self) -> Address {
        self.state.read().owner
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::new([0x0A; 20])
    }

    fn stranger() -> Address {
        Address::new([0x0B; 20])
    }

    #[test]
    fn test_new_gate_is_unpaused() {
        let gate = OwnerGate::new(owner()).unwrap();
        assert!(!gate.is_paused());
        assert_eq!(gate.current_owner(), owner());
    }

    #[test]
    fn test_zero_owner_rejected() {
        assert_eq!(
            OwnerGate::new(Address::ZERO).unwrap_err(),
            AccessError::InvalidOwner
        );
    }

    #[test]
    fn test_pause_unpause_cycle() {
        let gate = OwnerGate::new(owner()).unwrap();

        gate.pause(owner()).unwrap();
        assert!(gate.is_paused());
        assert_eq!(gate.pause(owner()).unwrap_err(), AccessError::AlreadyPaused);

        gate.unpause(owner()).unwrap();
        assert!(!gate.is_paused());
        assert_eq!(gate.unpause(owner()).unwrap_err(), AccessError::NotPaused);
    }

    #[test]
    fn test_non_owner_cannot_mutate() {
        let gate = OwnerGate::new(owner()).unwrap();
        let expected = AccessError::Unauthorized { caller: stranger() };

        assert_eq!(gate.pause(stranger()).unwrap_err(), expected);
        assert_eq!(
            gate.transfer_ownership(stranger(), stranger()).unwrap_err(),
            expected
        );
        assert_eq!(gate.renounce_ownership(stranger()).unwrap_err(), expected);
        assert!(!gate.is_paused());
    }

    #[test]
    fn test_transfer_ownership() {
        let gate = OwnerGate::new(owner()).unwrap();
        assert_eq!(
            gate.transfer_ownership(owner(), Address::ZERO).unwrap_err(),
            AccessError::InvalidOwner
        );

        gate.transfer_ownership(owner(), stranger()).unwrap();
        assert_eq!(gate.current_owner(), stranger());
        assert!(gate.pause(owner()).is_err());
        gate.pause(stranger()).unwrap();
        assert!(gate.is_paused());
    }

    #[test]
    fn test_renounce_freezes_gate() {
        let gate = OwnerGate::new(owner()).unwrap();
        gate.renounce_ownership(owner()).unwrap();

        assert!(gate.current_owner().is_zero());
        assert!(gate.pause(owner()).is_err());
        assert!(gate.pause(Address::ZERO).is_err());
        assert!(!gate.is_paused());
    }
}
