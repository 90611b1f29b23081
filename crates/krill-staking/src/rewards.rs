// crates/krill-staking/src/rewards.rs
//
// Reward and commission accrual for a prover's pool.
//
// Rewards are injected as a lump sum per settled proving period. The prover
// skims its commission; the rest raises a reward-per-share accumulator that
// stakers settle against whenever their share count changes. Division
// remainders are routed to the treasury dust sink, so the accumulator never
// promises more than was injected.

use serde::{Deserialize, Serialize};

use krill_core::error::LedgerError;
use krill_core::units::Plank;

use crate::math::bps_of;

/// Fixed-point precision of the reward-per-share accumulator.
pub const REWARD_PRECISION: u128 = 1_000_000_000_000;

/// Outcome of a single reward injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accrual {
    /// Value skimmed for the prover, in plank.
    pub commission: Plank,
    /// Value made claimable by stakers through the accumulator, in plank.
    pub to_stakers: Plank,
    /// Division remainder routed to the treasury dust sink, in plank.
    pub dust: Plank,
}

/// Per-prover reward accounting: the accumulator, the commission rate, and
/// commission accrued but not yet claimed.
///
/// `pending_commission` is deliberately outside the pool: slashing destroys
/// pooled collateral, never earned commission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardMeter {
    acc_reward_per_share: u128,
    commission_rate_bps: u64,
    pending_commission: Plank,
}

impl RewardMeter {
    /// A fresh meter with the given commission rate.
    pub fn new(commission_rate_bps: u64) -> Self {
        Self {
            acc_reward_per_share: 0,
            commission_rate_bps,
            pending_commission: 0,
        }
    }

    /// Current accumulator value (monotonically non-decreasing).
    pub fn acc_reward_per_share(&self) -> u128 {
        self.acc_reward_per_share
    }

    /// Current commission rate in basis points.
    pub fn commission_rate_bps(&self) -> u64 {
        self.commission_rate_bps
    }

    /// Commission accrued and not yet claimed, in plank.
    pub fn pending_commission(&self) -> Plank {
        self.pending_commission
    }

    /// Change the commission rate. Applies to future injections only.
    pub fn set_commission_rate(&mut self, bps: u64) {
        self.commission_rate_bps = bps;
    }

    /// Accrue an injected reward of `value` against `total_shares`.
    ///
    /// With no shares outstanding the whole injection becomes commission
    /// rather than stranding in an unclaimable accumulator.
    pub fn accrue(&mut self, value: Plank, total_shares: u64) -> Result<Accrual, LedgerError> {
        let commission = bps_of(value, self.commission_rate_bps);
        let to_stakers = value - commission;

        if total_shares == 0 {
            self.pending_commission = self
                .pending_commission
                .checked_add(value)
                .ok_or(LedgerError::Overflow)?;
            return Ok(Accrual {
                commission: value,
                to_stakers: 0,
                dust: 0,
            });
        }

        let delta = to_stakers as u128 * REWARD_PRECISION / total_shares as u128;
        let new_acc = self
            .acc_reward_per_share
            .checked_add(delta)
            .ok_or(LedgerError::Overflow)?;
        let new_pending = self
            .pending_commission
            .checked_add(commission)
            .ok_or(LedgerError::Overflow)?;

        // What the accumulator can actually pay out across all shares;
        // the shortfall is dust.
        let credited = (delta * total_shares as u128 / REWARD_PRECISION) as u64;
        let dust = to_stakers - credited;

        self.acc_reward_per_share = new_acc;
        self.pending_commission = new_pending;

        Ok(Accrual {
            commission,
            to_stakers: credited,
            dust,
        })
    }

    /// Take the full pending commission, zeroing it.
    pub fn take_commission(&mut self) -> Plank {
        std::mem::take(&mut self.pending_commission)
    }
}
