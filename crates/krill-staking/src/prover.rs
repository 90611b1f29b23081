// crates/krill-staking/src/prover.rs
//
// The per-prover aggregate: one record owning the collateral pool, the
// slashing scale, the reward meter, and the per-staker positions and
// withdrawal queues.
//
// Each of the three accounting records is mutated only through the ledger
// operation responsible for it; a slash touches the scalar fields here and
// nothing inside `positions` or `queues`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use krill_core::error::LedgerError;
use krill_core::identity::AccountId;
use krill_core::units::Plank;

use crate::lifecycle::ProverState;
use crate::pool::CollateralPool;
use crate::rewards::{RewardMeter, REWARD_PRECISION};
use crate::scale::SlashScale;
use crate::unbonding::UnbondingQueue;

/// One staker's position against one prover's pool.
///
/// A position survives at zero shares (its pending rewards remain
/// claimable) until its owner re-stakes; pruning is left to the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakePosition {
    /// Active collateral, in pool shares.
    pub shares: u64,
    /// Accumulator value at the last settlement.
    pub reward_debt: u128,
    /// Rewards settled but not yet claimed, in plank.
    pub pending_rewards: Plank,
}

impl StakePosition {
    /// An empty position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle rewards earned since the last settlement against `acc`.
    ///
    /// Must run before any change to `shares`, so value deposited later
    /// cannot collect rewards injected earlier.
    pub fn settle(&mut self, acc: u128) -> Result<(), LedgerError> {
        let owed = (acc - self.reward_debt)
            .checked_mul(self.shares as u128)
            .ok_or(LedgerError::Overflow)?
            / REWARD_PRECISION;
        self.pending_rewards = self
            .pending_rewards
            .checked_add(owed as u64)
            .ok_or(LedgerError::Overflow)?;
        self.reward_debt = acc;
        Ok(())
    }

    /// Rewards claimable right now: settled plus not-yet-settled, in plank.
    pub fn claimable(&self, acc: u128) -> Plank {
        let unsettled = (acc - self.reward_debt)
            .saturating_mul(self.shares as u128)
            / REWARD_PRECISION;
        self.pending_rewards.saturating_add(unsettled as u64)
    }
}

/// A registered prover's full ledger record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProverRecord {
    /// Lifecycle state.
    pub state: ProverState,
    /// The collateral pool backing this prover.
    pub pool: CollateralPool,
    /// Cumulative slashing scale for value outside the pool.
    pub scale: SlashScale,
    /// Sum of raw units across every pending withdrawal request.
    pub total_unbonding_raw: u128,
    /// Reward and commission accounting.
    pub rewards: RewardMeter,
    /// Per-staker positions, keyed by staker account.
    pub positions: HashMap<AccountId, StakePosition>,
    /// Per-staker withdrawal queues, keyed by staker account.
    pub queues: HashMap<AccountId, UnbondingQueue>,
    /// Number of positions currently holding shares.
    pub staker_count: u32,
    /// Block height at registration.
    pub registered_at: u64,
}

impl ProverRecord {
    /// A fresh Active record with an empty pool.
    pub fn new(commission_rate_bps: u64, now: u64) -> Self {
        Self {
            state: ProverState::Active,
            pool: CollateralPool::new(),
            scale: SlashScale::full(),
            total_unbonding_raw: 0,
            rewards: RewardMeter::new(commission_rate_bps),
            positions: HashMap::new(),
            queues: HashMap::new(),
            staker_count: 0,
            registered_at: now,
        }
    }

    /// Current effective value of all pending withdrawals, in plank.
    ///
    /// Maintained as one scalar, so a slash reprices every request without
    /// reading a single one of them.
    pub fn unbonding_effective(&self) -> Plank {
        self.scale.apply(self.total_unbonding_raw)
    }

    /// The prover's own active collateral value, in plank.
    pub fn self_collateral(&self, prover: &AccountId) -> Plank {
        match self.positions.get(prover) {
            Some(position) => self.pool.value_of_shares(position.shares),
            None => 0,
        }
    }

    /// Pending withdrawal requests of the prover's own account.
    pub fn self_unbonding_is_empty(&self, prover: &AccountId) -> bool {
        self.queues.get(prover).map_or(true, |q| q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settle_accrues_and_resets_debt() {
        let mut position = StakePosition {
            shares: 100,
            reward_debt: 0,
            pending_rewards: 0,
        };
        let acc = 5 * REWARD_PRECISION; // 5 plank per share
        position.settle(acc).unwrap();
        assert_eq!(position.pending_rewards, 500);
        assert_eq!(position.reward_debt, acc);

        // Settling again at the same accumulator owes nothing more
        position.settle(acc).unwrap();
        assert_eq!(position.pending_rewards, 500);
    }

    #[test]
    fn test_claimable_includes_unsettled() {
        let position = StakePosition {
            shares: 10,
            reward_debt: 0,
            pending_rewards: 3,
        };
        assert_eq!(position.claimable(2 * REWARD_PRECISION), 23);
    }

    #[test]
    fn test_unbonding_effective_tracks_scale() {
        let mut record = ProverRecord::new(0, 0);
        record.total_unbonding_raw = 1_000;
        assert_eq!(record.unbonding_effective(), 1_000);
        record.scale.set(5_250);
        assert_eq!(record.unbonding_effective(), 525);
    }

    #[test]
    fn test_self_collateral_without_position() {
        let record = ProverRecord::new(0, 0);
        let prover = AccountId::from_bytes([1u8; 32]);
        assert_eq!(record.self_collateral(&prover), 0);
        assert!(record.self_unbonding_is_empty(&prover));
    }
}
