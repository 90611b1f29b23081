// crates/krill-core/src/error.rs
//
// Protocol-wide error taxonomy for the Krill Protocol staking ledger.
//
// Every rejected operation surfaces one of these variants and leaves all
// ledger state unchanged. Authorization failures are reported before any
// other validation runs, so a caller probing with a bad role learns nothing
// about ledger contents.

use thiserror::Error;

/// Errors surfaced by the staking ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Caller lacks the role required for this operation.
    #[error("caller is not authorized to {0}")]
    Unauthorized(&'static str),

    /// An amount argument was zero.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// A deposit too small to be represented as at least one pool share.
    #[error("deposit is too small to issue a single pool share")]
    DepositTooSmall,

    /// Commission rate above 100%.
    #[error("commission rate {0} bps exceeds 10000 bps (100%)")]
    InvalidCommission(u64),

    /// Operation names a prover that was never registered.
    #[error("prover is not registered")]
    UnknownProver,

    /// Registration of an account that already holds a prover record.
    #[error("prover is already registered")]
    AlreadyRegistered,

    /// New stake offered to a prover that is not accepting deposits.
    #[error("prover is {0} and cannot accept new stake")]
    ProverNotActive(String),

    /// A prover's own collateral is (or would be) below the configured floor.
    #[error("self-stake of {actual} plank is below the required minimum of {required} plank")]
    SelfStakeBelowMinimum {
        /// Configured minimum self-collateral, in plank.
        required: u64,
        /// The prover's effective self-collateral, in plank.
        actual: u64,
    },

    /// A withdrawal needs more shares than the position holds.
    #[error("position holds {available} shares but {required} are required")]
    InsufficientShares {
        /// Shares the requested value converts to.
        required: u64,
        /// Shares currently held by the position.
        available: u64,
    },

    /// A withdrawal of more value than the position is worth.
    #[error("requested {requested} plank exceeds the position's balance of {available} plank")]
    InsufficientBalance {
        /// The position's current value, in plank.
        available: u64,
        /// The requested value, in plank.
        requested: u64,
    },

    /// The per-(prover, staker) withdrawal queue is full.
    #[error("withdrawal queue already holds the maximum of {max} pending requests")]
    TooManyPendingRequests {
        /// Configured queue bound.
        max: usize,
    },

    /// Withdrawal below the minimum granule while the balance still exceeds it.
    #[error("withdrawal of {requested} plank is below the minimum granule of {minimum} plank")]
    WithdrawBelowMinimum {
        /// Configured minimum withdrawal, in plank.
        minimum: u64,
        /// The requested value, in plank.
        requested: u64,
    },

    /// Completion attempted with no matured withdrawal requests.
    #[error("no withdrawal requests are ready")]
    NoReadyRequests,

    /// Percentage slash above the configured per-call cap.
    #[error("slash of {requested_bps} bps exceeds the per-call cap of {cap_bps} bps")]
    SlashTooHigh {
        /// Configured maximum slash per call, in bps.
        cap_bps: u64,
        /// The requested percentage, in bps.
        requested_bps: u64,
    },

    /// Slash that would push the slashing scale below its hard floor.
    #[error("slash would push the scale to {would_be_bps} bps, below the floor of {floor_bps} bps")]
    ScaleBelowFloor {
        /// Configured scale floor, in bps.
        floor_bps: u64,
        /// The scale the slash would produce, in bps.
        would_be_bps: u64,
    },

    /// Reactivation while the slashing scale sits below the deactivation threshold.
    #[error("slashing scale of {current_bps} bps is below the {threshold_bps} bps threshold")]
    InvalidScale {
        /// Configured deactivation threshold, in bps.
        threshold_bps: u64,
        /// The prover's current scale, in bps.
        current_bps: u64,
    },

    /// Operation invalid for the current lifecycle or ledger state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Pool with shares but no value (or value but no shares); deposits blocked.
    #[error("pool shares and value are stranded apart; deposits are blocked")]
    OrphanedPool,

    /// Integer overflow in ledger arithmetic.
    #[error("arithmetic overflow")]
    Overflow,

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}
