// crates/krill-staking/src/treasury.rs
//
// The protocol treasury sink.
//
// The treasury receives two flows from the staking ledger:
//   - all value destroyed by slashing (pool and unbonding portions)
//   - integer-division remainders from reward distribution
//
// Spending is a governance concern outside this subsystem; only a guarded
// withdraw is exposed.

use serde::{Deserialize, Serialize};

use krill_core::error::LedgerError;
use krill_core::units::Plank;

/// The protocol treasury.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Treasury {
    balance: Plank,
    slashed_total: Plank,
    dust_total: Plank,
}

impl Treasury {
    /// An empty treasury.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance, in plank.
    pub fn balance(&self) -> Plank {
        self.balance
    }

    /// Lifetime intake from slashing, in plank.
    pub fn slashed_total(&self) -> Plank {
        self.slashed_total
    }

    /// Lifetime intake from rounding dust, in plank.
    pub fn dust_total(&self) -> Plank {
        self.dust_total
    }

    /// Deposit slashed value.
    pub fn deposit_slashed(&mut self, amount: Plank) {
        self.balance = self.balance.saturating_add(amount);
        self.slashed_total = self.slashed_total.saturating_add(amount);
    }

    /// Deposit a rounding remainder.
    pub fn deposit_dust(&mut self, amount: Plank) {
        self.balance = self.balance.saturating_add(amount);
        self.dust_total = self.dust_total.saturating_add(amount);
    }

    /// Withdraw from the treasury.
    ///
    /// # Errors
    /// Returns `LedgerError::InvalidState` if the balance does not cover
    /// the requested amount.
    pub fn withdraw(&mut self, amount: Plank) -> Result<(), LedgerError> {
        if amount > self.balance {
            return Err(LedgerError::InvalidState(format!(
                "insufficient treasury balance: requested {} plank but only {} plank available",
                amount, self.balance
            )));
        }
        self.balance -= amount;
        Ok(())
    }
}
