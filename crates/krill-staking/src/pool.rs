// crates/krill-staking/src/pool.rs
//
// Per-prover collateral pool: the exchange rate between deposited value
// and pool shares.
//
// A share is a claim on a proportional slice of the pool. Depositing value
// issues shares at the current rate; slashing removes value while leaving
// the share count untouched, which reprices every share in one subtraction.
// The first deposit into an empty pool is issued 1:1.

use serde::{Deserialize, Serialize};

use krill_core::error::LedgerError;
use krill_core::units::Plank;

use crate::math::{mul_div, narrow};

/// A single prover's collateral pool.
///
/// Share/value conversions floor in the pool's favor. A pool left with
/// shares but no value (or value but no shares) refuses further deposits
/// rather than hand the stranded side to a newcomer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollateralPool {
    total_shares: u64,
    value: Plank,
}

impl CollateralPool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total shares issued by this pool.
    pub fn total_shares(&self) -> u64 {
        self.total_shares
    }

    /// Total value held by this pool, in plank.
    pub fn value(&self) -> Plank {
        self.value
    }

    /// Shares a deposit of `value` would be issued at the current rate.
    ///
    /// The first deposit into a truly empty pool is 1:1. A pool holding
    /// shares without value (or value without shares) blocks deposits with
    /// [`LedgerError::OrphanedPool`].
    pub fn shares_for_deposit(&self, value: Plank) -> Result<u64, LedgerError> {
        if self.total_shares == 0 && self.value == 0 {
            return Ok(value);
        }
        if self.total_shares == 0 || self.value == 0 {
            return Err(LedgerError::OrphanedPool);
        }
        let shares = mul_div(value as u128, self.total_shares as u128, self.value as u128)?;
        narrow(shares)
    }

    /// Value of `shares` at the current rate, in plank. Zero if no shares exist.
    ///
    /// Callers pass share counts actually issued by this pool, so the
    /// result always fits the pool's value.
    pub fn value_of_shares(&self, shares: u64) -> Plank {
        if self.total_shares == 0 {
            return 0;
        }
        debug_assert!(shares <= self.total_shares);
        (shares as u128 * self.value as u128 / self.total_shares as u128) as u64
    }

    /// Shares equivalent to `value` at the current rate, floored.
    pub fn shares_for_value(&self, value: Plank) -> u64 {
        if self.value == 0 {
            return 0;
        }
        (value as u128 * self.total_shares as u128 / self.value as u128) as u64
    }

    /// Add deposited value and the shares issued against it.
    pub fn credit(&mut self, value: Plank, shares: u64) -> Result<(), LedgerError> {
        self.value = self.value.checked_add(value).ok_or(LedgerError::Overflow)?;
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Remove withdrawn value and the shares burned for it.
    ///
    /// Callers validate that the pool covers both amounts.
    pub fn debit(&mut self, value: Plank, shares: u64) {
        debug_assert!(value <= self.value && shares <= self.total_shares);
        self.value = self.value.saturating_sub(value);
        self.total_shares = self.total_shares.saturating_sub(shares);
    }

    /// Destroy `amount` of pool value without touching the share count.
    ///
    /// This single subtraction reprices every outstanding share.
    pub fn slash_value(&mut self, amount: Plank) {
        debug_assert!(amount <= self.value);
        self.value = self.value.saturating_sub(amount);
    }
}
