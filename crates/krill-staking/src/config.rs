// crates/krill-staking/src/config.rs
//
// Staking ledger configuration.
//
// Defaults follow the network's economics parameters:
//   - Unbonding delay: 7,200 blocks (~24 hours at 12s/block)
//   - Minimum prover self-stake: 1,000 KRL
//   - Minimum withdrawal granule: 10 KRL
//   - Slash cap per call: 5,000 bps (50%)
//   - Scale floor: 100 bps; deactivation threshold: 5,000 bps

use serde::{Deserialize, Serialize};

use krill_core::units::{Plank, PLANK_PER_KRL};

/// Tunable parameters of the staking ledger.
///
/// The delay, self-stake floor, and slash cap are admin-settable at
/// runtime; the remaining fields are fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Blocks between filing a withdrawal request and its maturity.
    pub unbond_delay_blocks: u64,
    /// Minimum effective self-collateral a prover must hold, in plank.
    /// Gates registration and third-party deposits.
    pub min_self_stake: Plank,
    /// Minimum withdrawal granule, in plank. Balances already below this
    /// may still exit in full.
    pub min_withdrawal: Plank,
    /// Maximum slash percentage per call, in bps.
    pub max_slash_per_call_bps: u64,
    /// Hard floor for the slashing scale, in bps. A slash that would land
    /// below this is rejected outright.
    pub min_scale_floor_bps: u64,
    /// Scale below which a prover is automatically deactivated, in bps.
    pub deactivation_scale_threshold_bps: u64,
    /// Maximum open withdrawal requests per (prover, staker) pair.
    pub max_pending_requests: usize,
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            unbond_delay_blocks: 7_200,
            min_self_stake: 1_000 * PLANK_PER_KRL,
            min_withdrawal: 10 * PLANK_PER_KRL,
            max_slash_per_call_bps: 5_000,
            min_scale_floor_bps: 100,
            deactivation_scale_threshold_bps: 5_000,
            max_pending_requests: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StakingConfig::default();
        assert_eq!(config.unbond_delay_blocks, 7_200);
        assert_eq!(config.min_self_stake, 1_000 * PLANK_PER_KRL);
        assert_eq!(config.min_withdrawal, 10 * PLANK_PER_KRL);
        assert_eq!(config.max_slash_per_call_bps, 5_000);
        assert!(config.min_scale_floor_bps < config.deactivation_scale_threshold_bps);
    }

    #[test]
    fn test_serde_round_trip() {
        let config = StakingConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: StakingConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_pending_requests, config.max_pending_requests);
    }
}
