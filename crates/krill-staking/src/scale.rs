// crates/krill-staking/src/scale.rs
//
// The per-prover slashing scale: a monotonically non-increasing basis-point
// multiplier representing cumulative slashing applied to value that is not
// inside the active pool.
//
// Withdrawal requests are filed in "raw units" normalized against the scale
// at filing time; their redeemable value at any later moment is
// raw * scale / SCALE_MAX. A slash therefore reaches every pending request
// by updating this one number; no request is ever rewritten.

use serde::{Deserialize, Serialize};

use krill_core::units::Plank;

use crate::math::BPS_DENOMINATOR;

/// The scale of an unslashed prover: 10_000 bps = 100%.
pub const SCALE_MAX_BPS: u64 = 10_000;

/// A prover's slashing scale, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashScale {
    bps: u64,
}

impl SlashScale {
    /// The scale of a freshly registered prover (no slashing yet).
    pub fn full() -> Self {
        Self { bps: SCALE_MAX_BPS }
    }

    /// Current scale in basis points.
    pub fn bps(&self) -> u64 {
        self.bps
    }

    /// The scale a slash of `percent_bps` would compound down to.
    ///
    /// new = scale * (10_000 - percent_bps) / 10_000, floored.
    pub fn compounded(&self, percent_bps: u64) -> u64 {
        debug_assert!(percent_bps <= BPS_DENOMINATOR);
        (self.bps as u128 * (BPS_DENOMINATOR - percent_bps) as u128 / BPS_DENOMINATOR as u128)
            as u64
    }

    /// Lower the scale to `bps`. The scale only ever moves down.
    pub fn set(&mut self, bps: u64) {
        debug_assert!(bps <= self.bps);
        self.bps = bps;
    }

    /// Normalize `value` to raw units at the current scale.
    ///
    /// raw = value * SCALE_MAX / scale, floored. A request filed at a
    /// lowered scale books proportionally more raw units, so later slashes
    /// hit it with the same force as value still in the pool.
    pub fn normalize(&self, value: Plank) -> u128 {
        debug_assert!(self.bps > 0);
        value as u128 * SCALE_MAX_BPS as u128 / self.bps as u128
    }

    /// Redeemable value of `raw` units at the current scale, floored.
    pub fn apply(&self, raw: u128) -> Plank {
        (raw * self.bps as u128 / SCALE_MAX_BPS as u128) as u64
    }
}

impl Default for SlashScale {
    fn default() -> Self {
        Self::full()
    }
}
