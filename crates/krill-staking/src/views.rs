// crates/krill-staking/src/views.rs
//
// Read-only views over ledger state, shaped for RPC and CLI consumers.

use std::fmt;

use serde::{Deserialize, Serialize};

use krill_core::units::{Krl, Plank};

use crate::lifecycle::ProverState;

/// Snapshot of one prover's standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProverSummary {
    /// Lifecycle state.
    pub state: ProverState,
    /// Active pool value, in plank.
    pub pool_value: Plank,
    /// Shares outstanding against the pool.
    pub total_shares: u64,
    /// The prover's own active collateral value, in plank.
    pub self_collateral: Plank,
    /// Positions currently holding shares.
    pub staker_count: u32,
    /// Slashing scale, in bps.
    pub scale_bps: u64,
    /// Effective value of all pending withdrawals, in plank.
    pub unbonding_value: Plank,
    /// Commission accrued and unclaimed, in plank.
    pub pending_commission: Plank,
}

impl fmt::Display for ProverSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | pool {} | self {} | {} stakers | scale {} bps",
            self.state,
            Krl::from_plank(self.pool_value),
            Krl::from_plank(self.self_collateral),
            self.staker_count,
            self.scale_bps
        )
    }
}

/// Snapshot of one staker's position against one prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeSummary {
    /// Current value of active shares, in plank.
    pub active_value: Plank,
    /// Effective value of pending withdrawals, in plank.
    pub pending_value: Plank,
    /// Open withdrawal requests.
    pub pending_requests: usize,
    /// Rewards claimable right now, in plank.
    pub claimable_rewards: Plank,
}

impl fmt::Display for StakeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "active {} | unbonding {} ({} requests) | rewards {}",
            Krl::from_plank(self.active_value),
            Krl::from_plank(self.pending_value),
            self.pending_requests,
            Krl::from_plank(self.claimable_rewards)
        )
    }
}

/// Detail of a single pending withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDetail {
    /// Ledger-wide request id.
    pub id: u64,
    /// Effective redeemable value at the queried block, in plank.
    pub value: Plank,
    /// Block height at which the request matures.
    pub ready_at: u64,
    /// Whether the request has matured at the queried block.
    pub mature: bool,
}
