// crates/krill-staking/src/unbonding.rs
//
// Per-(prover, staker) withdrawal queue.
//
// Each request is stored in scale-normalized raw units with a fixed ready
// time. Requests are only ever appended, matured, or retroactively reduced
// by a scale change; there is no cancellation path back into active stake.
// The queue is bounded so completion stays a constant-cost walk.

use serde::{Deserialize, Serialize};

use krill_core::error::LedgerError;

/// A single pending withdrawal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnbondingRequest {
    /// Ledger-wide request id, assigned at filing time.
    pub id: u64,
    /// Withdrawal amount normalized to the full-scale baseline.
    pub raw_units: u128,
    /// Block height at which the request matures.
    pub ready_at: u64,
}

/// Ordered list of one staker's pending withdrawals against one prover.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnbondingQueue {
    requests: Vec<UnbondingRequest>,
}

impl UnbondingQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// True if no requests are pending.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// The pending requests, oldest first.
    pub fn requests(&self) -> &[UnbondingRequest] {
        &self.requests
    }

    /// Append a request, enforcing the queue bound.
    pub fn push(&mut self, request: UnbondingRequest, max_pending: usize) -> Result<(), LedgerError> {
        if self.requests.len() >= max_pending {
            return Err(LedgerError::TooManyPendingRequests { max: max_pending });
        }
        self.requests.push(request);
        Ok(())
    }

    /// Remove and return every request with `ready_at <= now`.
    ///
    /// Requests that have not matured stay queued in order.
    pub fn drain_ready(&mut self, now: u64) -> Vec<UnbondingRequest> {
        let mut matured = Vec::new();
        let mut remaining = Vec::new();

        for request in self.requests.drain(..) {
            if request.ready_at <= now {
                matured.push(request);
            } else {
                remaining.push(request);
            }
        }

        self.requests = remaining;
        matured
    }

    /// Number of matured requests at `now`.
    pub fn ready_count(&self, now: u64) -> usize {
        self.requests.iter().filter(|r| r.ready_at <= now).count()
    }
}
