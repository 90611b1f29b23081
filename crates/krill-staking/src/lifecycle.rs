// crates/krill-staking/src/lifecycle.rs
//
// Prover lifecycle states.
//
// Registration creates an Active record (an unregistered account simply has
// no record). Active and Deactivated are reversible neighbors; Retired is a
// stricter parked state that is only ever entered deliberately, never by
// the automatic deactivation checks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a registered prover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProverState {
    /// Accepting new stake and eligible for work.
    Active,
    /// Suspended: no new stake, existing stakers may still exit.
    Deactivated,
    /// Wound down by its operator: no new stake until explicitly unretired.
    Retired,
}

impl ProverState {
    /// Whether new deposits may flow into this prover's pool.
    pub fn accepts_stake(&self) -> bool {
        matches!(self, ProverState::Active)
    }
}

impl fmt::Display for ProverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProverState::Active => "active",
            ProverState::Deactivated => "deactivated",
            ProverState::Retired => "retired",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_accepts_stake() {
        assert!(ProverState::Active.accepts_stake());
        assert!(!ProverState::Deactivated.accepts_stake());
        assert!(!ProverState::Retired.accepts_stake());
    }

    #[test]
    fn test_display() {
        assert_eq!(ProverState::Deactivated.to_string(), "deactivated");
    }
}
