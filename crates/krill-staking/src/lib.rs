// crates/krill-staking/src/lib.rs
//
// krill-staking: prover collateral pools, delegation, unbonding, reward
// accrual, and O(1) slashing for the Krill Protocol.
//
// Provers post self-collateral and receive delegated stake into a
// share-based pool. Slashing destroys a percentage of a prover's pooled
// and mid-withdrawal collateral by updating three scalar fields, so its
// cost never depends on how many stakers or pending requests exist.
// All monetary values are integer plank (1 KRL = 10^9 plank).

pub mod config;
pub mod ledger;
pub mod lifecycle;
pub mod math;
pub mod pool;
pub mod prover;
pub mod rewards;
pub mod scale;
pub mod treasury;
pub mod unbonding;
pub mod views;

// Re-export key types for ergonomic access from downstream crates.
pub use config::StakingConfig;
pub use ledger::StakingLedger;
pub use lifecycle::ProverState;
pub use pool::CollateralPool;
pub use prover::{ProverRecord, StakePosition};
pub use rewards::{Accrual, RewardMeter, REWARD_PRECISION};
pub use scale::{SlashScale, SCALE_MAX_BPS};
pub use treasury::Treasury;
pub use unbonding::{UnbondingQueue, UnbondingRequest};
pub use views::{ProverSummary, RequestDetail, StakeSummary};
