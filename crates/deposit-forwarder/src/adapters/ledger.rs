//! # Ledger Adapter
//!
//! In-memory native value ledger for testing and simulation.
//! Balance changes made while a checkpoint is open are journaled so the
//! checkpoint can be reverted. Changes outside any checkpoint are final.

use crate::domain::value_objects::{Address, U256};
use crate::errors::LedgerError;
use crate::ports::outbound::{Checkpoint, Journaled, ValueLedger};
use std::collections::HashMap;

/// In-memory balances with an undo journal.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Address, U256>,
    /// Previous balance of each touched account, oldest first.
    journal: Vec<(Address, U256)>,
    /// Open checkpoints.
    depth: usize,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints `amount` into `account`. Journaled like any other change.
    pub fn credit(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
        let current = self.balance_of(account);
        let updated = current
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account })?;
        self.set_balance(account, updated);
        Ok(())
    }

    /// Sum of every balance.
    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.balances
            .values()
            .fold(U256::zero(), |acc, balance| acc.saturating_add(*balance))
    }

    /// Number of journal entries not yet committed away.
    #[must_use]
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    fn set_balance(&mut self, account: Address, balance: U256) {
        if self.depth > 0 {
            let previous = self.balance_of(account);
            self.journal.push((account, previous));
        }
        if balance.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}

impl InMemoryLedger {
    fn close_checkpoint(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.journal.clear();
        }
    }
}

impl Journaled for InMemoryLedger {
    fn checkpoint(&mut self) -> Checkpoint {
        self.depth += 1;
        Checkpoint(self.journal.len())
    }

    fn commit(&mut self, _checkpoint: Checkpoint) {
        // Inner commits keep history for an enclosing revert.
        self.close_checkpoint();
    }

    fn revert(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.0 {
            if let Some((account, previous)) = self.journal.pop() {
                if previous.is_zero() {
                    self.balances.remove(&account);
                } else {
                    self.balances.insert(account, previous);
                }
            }
        }
        self.close_checkpoint();
    }
}

impl ValueLedger for InMemoryLedger {
    fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            });
        }
        if from == to || amount.is_zero() {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account: to })?;
        self.set_balance(from, available - amount);
        self.set_balance(to, credited);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::new([1u8; 20])
    }

    fn bob() -> Address {
        Address::new([2u8; 20])
    }

    #[test]
    fn test_credit_and_transfer() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(alice(), U256::from(1000)).unwrap();

        ledger.transfer(alice(), bob(), U256::from(400)).unwrap();
        assert_eq!(ledger.balance_of(alice()), U256::from(600));
        assert_eq!(ledger.balance_of(bob()), U256::from(400));
        assert_eq!(ledger.total_supply(), U256::from(1000));
    }

    #[test]
    fn test_insufficient_balance() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(alice(), U256::from(10)).unwrap();

        let err = ledger.transfer(alice(), bob(), U256::from(11)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: alice(),
                required: U256::from(11),
                available: U256::from(10),
            }
        );
        assert_eq!(ledger.balance_of(alice()), U256::from(10));
    }

    #[test]
    fn test_credit_overflow() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(alice(), U256::MAX).unwrap();
        assert_eq!(
            ledger.credit(alice(), U256::one()).unwrap_err(),
            LedgerError::BalanceOverflow { account: alice() }
        );
    }

    #[test]
    fn test_revert_restores_balances() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(alice(), U256::from(100)).unwrap();

        let cp = ledger.checkpoint();
        ledger.transfer(alice(), bob(), U256::from(30)).unwrap();
        ledger.transfer(bob(), alice(), U256::from(5)).unwrap();
        ledger.revert(cp);

        assert_eq!(ledger.balance_of(alice()), U256::from(100));
        assert_eq!(ledger.balance_of(bob()), U256::zero());
        assert_eq!(ledger.total_supply(), U256::from(100));
    }

    #[test]
    fn test_nested_checkpoints() {
        let mut ledger = InMemoryLedger::new();
        let outer = ledger.checkpoint();
        ledger.credit(alice(), U256::from(50)).unwrap();

        let inner = ledger.checkpoint();
        ledger.transfer(alice(), bob(), U256::from(20)).unwrap();
        ledger.commit(inner);
        assert_eq!(ledger.balance_of(bob()), U256::from(20));

        ledger.revert(outer);
        assert_eq!(ledger.balance_of(alice()), U256::zero());
        assert_eq!(ledger.balance_of(bob()), U256::zero());
    }

    #[test]
    fn test_outermost_commit_clears_journal() {
        let mut ledger = InMemoryLedger::new();
        let cp = ledger.checkpoint();
        ledger.credit(alice(), U256::from(1)).unwrap();
        assert_eq!(ledger.journal_len(), 1);
        ledger.commit(cp);
        assert_eq!(ledger.journal_len(), 0);
        assert_eq!(ledger.balance_of(alice()), U256::one());
    }

    #[test]
    fn test_changes_outside_checkpoint_are_not_journaled() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(alice(), U256::from(100)).unwrap();
        ledger.transfer(alice(), bob(), U256::from(10)).unwrap();
        assert_eq!(ledger.journal_len(), 0);
    }

    #[test]
    fn test_journal_stays_bounded_after_funding() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(alice(), U256::from(1_000_000)).unwrap();

        for round in 0..100 {
            let cp = ledger.checkpoint();
            ledger.transfer(alice(), bob(), U256::one()).unwrap();
            ledger.transfer(bob(), alice(), U256::one()).unwrap();
            if round % 2 == 0 {
                ledger.commit(cp);
            } else {
                ledger.revert(cp);
            }
            assert_eq!(ledger.journal_len(), 0);
        }
        assert_eq!(ledger.balance_of(alice()), U256::from(1_000_000));
    }

    #[test]
    fn test_revert_of_inner_checkpoint_keeps_outer_history() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(alice(), U256::from(50)).unwrap();

        let outer = ledger.checkpoint();
        ledger.transfer(alice(), bob(), U256::from(20)).unwrap();
        let inner = ledger.checkpoint();
        ledger.transfer(alice(), bob(), U256::from(5)).unwrap();
        ledger.revert(inner);
        assert_eq!(ledger.balance_of(bob()), U256::from(20));
        assert_eq!(ledger.journal_len(), 2);

        ledger.revert(outer);
        assert_eq!(ledger.balance_of(alice()), U256::from(50));
        assert_eq!(ledger.balance_of(bob()), U256::zero());
        assert_eq!(ledger.journal_len(), 0);
    }
}
