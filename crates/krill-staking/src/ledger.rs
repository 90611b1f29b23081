// crates/krill-staking/src/ledger.rs
//
// The staking ledger: one aggregate owning every prover record, the
// treasury, and the privileged role accounts.
//
// Execution model: fully sequential, one operation at a time, atomic per
// operation. Every public method validates completely before mutating, so
// a rejected call leaves the ledger untouched. Authorization is checked
// before any other validation.
//
// Slashing is constant-time by construction: both entry points read and
// write only the prover's scalar fields (pool value, scale, raw-unbonding
// total), never the per-staker maps.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use krill_core::error::LedgerError;
use krill_core::identity::AccountId;
use krill_core::units::{Krl, Plank};

use crate::config::StakingConfig;
use crate::lifecycle::ProverState;
use crate::math::{bps_of, BPS_DENOMINATOR};
use crate::prover::{ProverRecord, StakePosition};
use crate::scale::SCALE_MAX_BPS;
use crate::treasury::Treasury;
use crate::unbonding::{UnbondingQueue, UnbondingRequest};
use crate::views::{ProverSummary, RequestDetail, StakeSummary};

/// The staking/slashing ledger for the prover network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingLedger {
    config: StakingConfig,
    admin: AccountId,
    slasher: AccountId,
    reward_source: AccountId,
    provers: HashMap<AccountId, ProverRecord>,
    treasury: Treasury,
    next_request_id: u64,
}

impl StakingLedger {
    /// Create an empty ledger with the given configuration and roles.
    ///
    /// # Panics
    /// Panics if the configuration is internally inconsistent: a scale
    /// floor outside [1, 10_000] bps, a deactivation threshold or slash
    /// cap above 10_000 bps, or a zero request-queue bound.
    pub fn new(
        config: StakingConfig,
        admin: AccountId,
        slasher: AccountId,
        reward_source: AccountId,
    ) -> Self {
        assert!(
            config.min_scale_floor_bps >= 1 && config.min_scale_floor_bps <= SCALE_MAX_BPS,
            "scale floor must be within [1, {}] bps",
            SCALE_MAX_BPS
        );
        assert!(
            config.deactivation_scale_threshold_bps <= SCALE_MAX_BPS,
            "deactivation threshold must not exceed {} bps",
            SCALE_MAX_BPS
        );
        assert!(
            config.max_slash_per_call_bps <= BPS_DENOMINATOR,
            "slash cap must not exceed {} bps",
            BPS_DENOMINATOR
        );
        assert!(
            config.max_pending_requests >= 1,
            "request queue bound must be at least 1"
        );

        Self {
            config,
            admin,
            slasher,
            reward_source,
            provers: HashMap::new(),
            treasury: Treasury::new(),
            next_request_id: 0,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &StakingConfig {
        &self.config
    }

    /// The protocol treasury sink.
    pub fn treasury(&self) -> &Treasury {
        &self.treasury
    }

    // -----------------------------------------------------------------
    // Registration and staking
    // -----------------------------------------------------------------

    /// Register `prover` with a bootstrap self-deposit.
    ///
    /// The bootstrap deposit is issued shares 1:1 and the record starts
    /// Active.
    pub fn register_prover(
        &mut self,
        prover: AccountId,
        self_collateral: Plank,
        commission_rate_bps: u64,
        now: u64,
    ) -> Result<(), LedgerError> {
        if commission_rate_bps > BPS_DENOMINATOR {
            return Err(LedgerError::InvalidCommission(commission_rate_bps));
        }
        if self_collateral == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if self_collateral < self.config.min_self_stake {
            return Err(LedgerError::SelfStakeBelowMinimum {
                required: self.config.min_self_stake,
                actual: self_collateral,
            });
        }
        if self.provers.contains_key(&prover) {
            return Err(LedgerError::AlreadyRegistered);
        }

        let mut record = ProverRecord::new(commission_rate_bps, now);
        record.pool.credit(self_collateral, self_collateral)?;
        record.positions.insert(
            prover,
            StakePosition {
                shares: self_collateral,
                reward_debt: 0,
                pending_rewards: 0,
            },
        );
        record.staker_count = 1;
        self.provers.insert(prover, record);

        info!(
            prover = %prover.short_hex(),
            self_stake = %Krl::from_plank(self_collateral),
            commission_bps = commission_rate_bps,
            "prover registered"
        );
        Ok(())
    }

    /// Deposit `value` into `prover`'s pool for `staker`.
    ///
    /// Returns the shares issued. Third-party deposits additionally
    /// require the prover's own collateral to meet the self-stake floor.
    pub fn stake(
        &mut self,
        prover: &AccountId,
        staker: &AccountId,
        value: Plank,
    ) -> Result<u64, LedgerError> {
        if value == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let min_self_stake = self.config.min_self_stake;
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        if !record.state.accepts_stake() {
            return Err(LedgerError::ProverNotActive(record.state.to_string()));
        }
        if staker != prover {
            let self_stake = record.self_collateral(prover);
            if self_stake < min_self_stake {
                return Err(LedgerError::SelfStakeBelowMinimum {
                    required: min_self_stake,
                    actual: self_stake,
                });
            }
        }

        let shares = record.pool.shares_for_deposit(value)?;
        if shares == 0 {
            return Err(LedgerError::DepositTooSmall);
        }

        // Settle on a copy first; nothing is written until every fallible
        // step has succeeded.
        let acc = record.rewards.acc_reward_per_share();
        let mut position = record.positions.get(staker).cloned().unwrap_or_default();
        let was_empty = position.shares == 0;
        position.settle(acc)?;
        position.shares = position
            .shares
            .checked_add(shares)
            .ok_or(LedgerError::Overflow)?;
        record.pool.credit(value, shares)?;
        record.positions.insert(*staker, position);
        if was_empty {
            record.staker_count += 1;
        }

        debug!(
            prover = %prover.short_hex(),
            staker = %staker.short_hex(),
            value = %Krl::from_plank(value),
            shares,
            "stake deposited"
        );
        Ok(shares)
    }

    // -----------------------------------------------------------------
    // Withdrawals
    // -----------------------------------------------------------------

    /// File a withdrawal request for `value` of `staker`'s position.
    ///
    /// The corresponding shares are burned immediately: the value stops
    /// earning rewards and stops being slashable through the pool (it
    /// remains slashable through the scale until completion). Returns the
    /// request id.
    pub fn request_withdraw(
        &mut self,
        prover: &AccountId,
        staker: &AccountId,
        value: Plank,
        now: u64,
    ) -> Result<u64, LedgerError> {
        if value == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let min_withdrawal = self.config.min_withdrawal;
        let max_pending = self.config.max_pending_requests;
        let ready_at = now
            .checked_add(self.config.unbond_delay_blocks)
            .ok_or(LedgerError::Overflow)?;

        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        let held_shares = record.positions.get(staker).map_or(0, |p| p.shares);
        let balance_value = record.pool.value_of_shares(held_shares);
        let shares_needed = record.pool.shares_for_value(value);

        if shares_needed > held_shares {
            return Err(LedgerError::InsufficientShares {
                required: shares_needed,
                available: held_shares,
            });
        }
        if value > balance_value {
            return Err(LedgerError::InsufficientBalance {
                available: balance_value,
                requested: value,
            });
        }
        // Below the granule only a full dust exit is allowed
        if value < min_withdrawal && balance_value >= min_withdrawal {
            return Err(LedgerError::WithdrawBelowMinimum {
                minimum: min_withdrawal,
                requested: value,
            });
        }
        if record.queues.get(staker).map_or(0, |q| q.len()) >= max_pending {
            return Err(LedgerError::TooManyPendingRequests { max: max_pending });
        }

        let raw = record.scale.normalize(value);
        let new_total_raw = record
            .total_unbonding_raw
            .checked_add(raw)
            .ok_or(LedgerError::Overflow)?;

        let acc = record.rewards.acc_reward_per_share();
        let mut position = record.positions.get(staker).cloned().unwrap_or_default();
        position.settle(acc)?;
        position.shares -= shares_needed;
        let emptied = position.shares == 0 && held_shares > 0;

        let id = self.next_request_id;
        record
            .queues
            .entry(*staker)
            .or_insert_with(UnbondingQueue::new)
            .push(
                UnbondingRequest {
                    id,
                    raw_units: raw,
                    ready_at,
                },
                max_pending,
            )?;
        record.pool.debit(value, shares_needed);
        record.positions.insert(*staker, position);
        if emptied {
            record.staker_count -= 1;
        }
        record.total_unbonding_raw = new_total_raw;
        self.next_request_id += 1;

        evaluate_auto_deactivation(&self.config, prover, record);

        debug!(
            prover = %prover.short_hex(),
            staker = %staker.short_hex(),
            value = %Krl::from_plank(value),
            request_id = id,
            ready_at,
            "withdrawal requested"
        );
        Ok(id)
    }

    /// File a withdrawal request for the full current value of `staker`'s
    /// position. Equivalent to [`Self::request_withdraw`] with that value.
    pub fn request_withdraw_all(
        &mut self,
        prover: &AccountId,
        staker: &AccountId,
        now: u64,
    ) -> Result<u64, LedgerError> {
        let value = {
            let record = self.provers.get(prover).ok_or(LedgerError::UnknownProver)?;
            let shares = record.positions.get(staker).map_or(0, |p| p.shares);
            record.pool.value_of_shares(shares)
        };
        self.request_withdraw(prover, staker, value, now)
    }

    /// Complete every matured withdrawal request of `staker` against
    /// `prover`, paying out their effective (scale-adjusted) value.
    pub fn complete_withdraw(
        &mut self,
        prover: &AccountId,
        staker: &AccountId,
        now: u64,
    ) -> Result<Plank, LedgerError> {
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        let queue = match record.queues.get_mut(staker) {
            Some(queue) if queue.ready_count(now) > 0 => queue,
            _ => return Err(LedgerError::NoReadyRequests),
        };

        // Sum before draining so an arithmetic fault cannot strand a
        // half-paid queue.
        let mut paid: Plank = 0;
        let mut raw_removed: u128 = 0;
        for request in queue.requests().iter().filter(|r| r.ready_at <= now) {
            paid = paid
                .checked_add(record.scale.apply(request.raw_units))
                .ok_or(LedgerError::Overflow)?;
            raw_removed += request.raw_units;
        }

        let matured = queue.drain_ready(now);
        if queue.is_empty() {
            record.queues.remove(staker);
        }
        record.total_unbonding_raw = record.total_unbonding_raw.saturating_sub(raw_removed);

        evaluate_auto_deactivation(&self.config, prover, record);

        debug!(
            prover = %prover.short_hex(),
            staker = %staker.short_hex(),
            paid = %Krl::from_plank(paid),
            requests = matured.len(),
            "withdrawals completed"
        );
        Ok(paid)
    }

    // -----------------------------------------------------------------
    // Slashing
    // -----------------------------------------------------------------

    /// Slash `percent_bps` of `prover`'s total collateral, pooled and
    /// mid-withdrawal alike, in constant time.
    ///
    /// Only the slashing role may call this. A percentage above the
    /// per-call cap is rejected with `SlashTooHigh`; a slash that would
    /// push the scale below its floor is rejected with `ScaleBelowFloor`.
    /// Returns the total value moved to the treasury.
    pub fn slash(
        &mut self,
        caller: &AccountId,
        prover: &AccountId,
        percent_bps: u64,
    ) -> Result<Plank, LedgerError> {
        if caller != &self.slasher {
            return Err(LedgerError::Unauthorized("slash"));
        }
        if percent_bps == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if percent_bps > self.config.max_slash_per_call_bps {
            return Err(LedgerError::SlashTooHigh {
                cap_bps: self.config.max_slash_per_call_bps,
                requested_bps: percent_bps,
            });
        }

        let floor = self.config.min_scale_floor_bps;
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;

        let new_scale = record.scale.compounded(percent_bps);
        if new_scale < floor {
            return Err(LedgerError::ScaleBelowFloor {
                floor_bps: floor,
                would_be_bps: new_scale,
            });
        }

        let slashed_pool = bps_of(record.pool.value(), percent_bps);
        let slashed_unbonding = bps_of(record.unbonding_effective(), percent_bps);
        let total = slashed_pool
            .checked_add(slashed_unbonding)
            .ok_or(LedgerError::Overflow)?;

        // The pool subtraction reprices every share; the scale update
        // reprices every pending request. Nothing per-staker is touched.
        record.pool.slash_value(slashed_pool);
        record.scale.set(new_scale);
        self.treasury.deposit_slashed(total);

        evaluate_auto_deactivation(&self.config, prover, record);

        info!(
            prover = %prover.short_hex(),
            percent_bps,
            slashed = %Krl::from_plank(total),
            scale_bps = new_scale,
            "prover slashed"
        );
        Ok(total)
    }

    /// Slash an absolute `value` of `prover`'s total collateral.
    ///
    /// The value converts to an equivalent percentage (floored) of the
    /// prover's pooled plus unbonding collateral; a percentage above the
    /// per-call cap is clamped to the cap rather than rejected. Returns
    /// the value actually slashed, which may be less than requested.
    pub fn slash_by_amount(
        &mut self,
        caller: &AccountId,
        prover: &AccountId,
        value: Plank,
    ) -> Result<Plank, LedgerError> {
        if caller != &self.slasher {
            return Err(LedgerError::Unauthorized("slash"));
        }
        if value == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let cap = self.config.max_slash_per_call_bps;
        let total = {
            let record = self.provers.get(prover).ok_or(LedgerError::UnknownProver)?;
            record.pool.value() as u128 + record.unbonding_effective() as u128
        };
        if total == 0 {
            debug!(prover = %prover.short_hex(), "slash by amount on empty collateral");
            return Ok(0);
        }

        let percent_bps =
            (value as u128 * BPS_DENOMINATOR as u128 / total).min(cap as u128) as u64;
        if percent_bps == 0 {
            return Ok(0);
        }
        self.slash(caller, prover, percent_bps)
    }

    // -----------------------------------------------------------------
    // Rewards and commission
    // -----------------------------------------------------------------

    /// Inject a settled period's reward for `prover`.
    ///
    /// Only the reward source may call this. Returns
    /// `(commission, to_stakers)`; the division remainder goes to the
    /// treasury dust sink.
    pub fn add_rewards(
        &mut self,
        caller: &AccountId,
        prover: &AccountId,
        value: Plank,
    ) -> Result<(Plank, Plank), LedgerError> {
        if caller != &self.reward_source {
            return Err(LedgerError::Unauthorized("report rewards"));
        }
        if value == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        let total_shares = record.pool.total_shares();
        let accrual = record.rewards.accrue(value, total_shares)?;
        self.treasury.deposit_dust(accrual.dust);

        debug!(
            prover = %prover.short_hex(),
            value = %Krl::from_plank(value),
            commission = accrual.commission,
            to_stakers = accrual.to_stakers,
            "rewards accrued"
        );
        Ok((accrual.commission, accrual.to_stakers))
    }

    /// Settle and pay out `staker`'s accrued rewards.
    pub fn claim_rewards(
        &mut self,
        prover: &AccountId,
        staker: &AccountId,
    ) -> Result<Plank, LedgerError> {
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        let acc = record.rewards.acc_reward_per_share();
        let position = match record.positions.get_mut(staker) {
            Some(position) => position,
            None => return Ok(0),
        };
        position.settle(acc)?;
        let paid = std::mem::take(&mut position.pending_rewards);

        debug!(
            prover = %prover.short_hex(),
            staker = %staker.short_hex(),
            paid = %Krl::from_plank(paid),
            "rewards claimed"
        );
        Ok(paid)
    }

    /// Pay out the prover's accrued commission. Only the prover itself
    /// may claim.
    pub fn claim_commission(
        &mut self,
        caller: &AccountId,
        prover: &AccountId,
    ) -> Result<Plank, LedgerError> {
        if caller != prover {
            return Err(LedgerError::Unauthorized("claim commission"));
        }
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        let paid = record.rewards.take_commission();

        debug!(prover = %prover.short_hex(), paid = %Krl::from_plank(paid), "commission claimed");
        Ok(paid)
    }

    /// Change `prover`'s commission rate for future reward injections.
    pub fn set_commission_rate(
        &mut self,
        caller: &AccountId,
        prover: &AccountId,
        rate_bps: u64,
    ) -> Result<(), LedgerError> {
        if caller != prover {
            return Err(LedgerError::Unauthorized("change the commission rate"));
        }
        if rate_bps > BPS_DENOMINATOR {
            return Err(LedgerError::InvalidCommission(rate_bps));
        }
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        record.rewards.set_commission_rate(rate_bps);
        info!(prover = %prover.short_hex(), rate_bps, "commission rate changed");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Administrative parameters
    // -----------------------------------------------------------------

    /// Change the unbonding delay for future requests (admin only).
    pub fn set_unbond_delay(&mut self, caller: &AccountId, blocks: u64) -> Result<(), LedgerError> {
        if caller != &self.admin {
            return Err(LedgerError::Unauthorized("change the unbonding delay"));
        }
        self.config.unbond_delay_blocks = blocks;
        info!(blocks, "unbonding delay changed");
        Ok(())
    }

    /// Change the minimum self-stake floor (admin only).
    pub fn set_min_self_stake(
        &mut self,
        caller: &AccountId,
        plank: Plank,
    ) -> Result<(), LedgerError> {
        if caller != &self.admin {
            return Err(LedgerError::Unauthorized("change the self-stake floor"));
        }
        self.config.min_self_stake = plank;
        info!(minimum = %Krl::from_plank(plank), "self-stake floor changed");
        Ok(())
    }

    /// Change the per-call slash cap (admin only).
    pub fn set_max_slash_per_call(
        &mut self,
        caller: &AccountId,
        bps: u64,
    ) -> Result<(), LedgerError> {
        if caller != &self.admin {
            return Err(LedgerError::Unauthorized("change the slash cap"));
        }
        if bps > BPS_DENOMINATOR {
            return Err(LedgerError::InvalidState(format!(
                "slash cap of {} bps exceeds {} bps",
                bps, BPS_DENOMINATOR
            )));
        }
        self.config.max_slash_per_call_bps = bps;
        info!(cap_bps = bps, "slash cap changed");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// Administratively suspend an Active prover.
    pub fn deactivate(&mut self, caller: &AccountId, prover: &AccountId) -> Result<(), LedgerError> {
        if caller != &self.admin {
            return Err(LedgerError::Unauthorized("deactivate a prover"));
        }
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        if record.state != ProverState::Active {
            return Err(LedgerError::InvalidState(format!(
                "cannot deactivate a {} prover",
                record.state
            )));
        }
        record.state = ProverState::Deactivated;
        info!(prover = %prover.short_hex(), "prover deactivated");
        Ok(())
    }

    /// Administratively reactivate a Deactivated prover.
    ///
    /// Rejected while the slashing scale still sits below the
    /// deactivation threshold.
    pub fn reactivate(&mut self, caller: &AccountId, prover: &AccountId) -> Result<(), LedgerError> {
        if caller != &self.admin {
            return Err(LedgerError::Unauthorized("reactivate a prover"));
        }
        let threshold = self.config.deactivation_scale_threshold_bps;
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        if record.state != ProverState::Deactivated {
            return Err(LedgerError::InvalidState(format!(
                "cannot reactivate a {} prover",
                record.state
            )));
        }
        let current = record.scale.bps();
        if current < threshold {
            return Err(LedgerError::InvalidScale {
                threshold_bps: threshold,
                current_bps: current,
            });
        }
        record.state = ProverState::Active;
        info!(prover = %prover.short_hex(), "prover reactivated");
        Ok(())
    }

    /// Retire a prover (the prover itself or the admin).
    ///
    /// Only permitted once the prover's own shares and own pending
    /// withdrawals are fully empty. Delegated stakers may keep
    /// withdrawing afterwards.
    pub fn retire(&mut self, caller: &AccountId, prover: &AccountId) -> Result<(), LedgerError> {
        if caller != prover && caller != &self.admin {
            return Err(LedgerError::Unauthorized("retire a prover"));
        }
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        if record.state == ProverState::Retired {
            return Err(LedgerError::InvalidState("prover is already retired".into()));
        }
        let own_shares = record.positions.get(prover).map_or(0, |p| p.shares);
        if own_shares != 0 || !record.self_unbonding_is_empty(prover) {
            return Err(LedgerError::InvalidState(
                "prover still holds active or unbonding self-collateral".into(),
            ));
        }
        record.state = ProverState::Retired;
        info!(prover = %prover.short_hex(), "prover retired");
        Ok(())
    }

    /// Return a Retired prover to Active with a fresh self-deposit.
    ///
    /// Requires the deposit to re-meet the self-stake floor and the
    /// slashing scale to sit at or above the deactivation threshold.
    pub fn unretire(
        &mut self,
        caller: &AccountId,
        prover: &AccountId,
        self_collateral: Plank,
    ) -> Result<(), LedgerError> {
        if caller != prover {
            return Err(LedgerError::Unauthorized("unretire a prover"));
        }
        if self_collateral == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if self_collateral < self.config.min_self_stake {
            return Err(LedgerError::SelfStakeBelowMinimum {
                required: self.config.min_self_stake,
                actual: self_collateral,
            });
        }
        let threshold = self.config.deactivation_scale_threshold_bps;
        let record = self.provers.get_mut(prover).ok_or(LedgerError::UnknownProver)?;
        if record.state != ProverState::Retired {
            return Err(LedgerError::InvalidState(format!(
                "cannot unretire a {} prover",
                record.state
            )));
        }
        let current = record.scale.bps();
        if current < threshold {
            return Err(LedgerError::InvalidScale {
                threshold_bps: threshold,
                current_bps: current,
            });
        }

        let shares = record.pool.shares_for_deposit(self_collateral)?;
        if shares == 0 {
            return Err(LedgerError::DepositTooSmall);
        }
        let acc = record.rewards.acc_reward_per_share();
        let mut position = record.positions.get(prover).cloned().unwrap_or_default();
        let was_empty = position.shares == 0;
        position.settle(acc)?;
        position.shares = position
            .shares
            .checked_add(shares)
            .ok_or(LedgerError::Overflow)?;
        record.pool.credit(self_collateral, shares)?;
        record.positions.insert(*prover, position);
        if was_empty {
            record.staker_count += 1;
        }
        record.state = ProverState::Active;

        info!(
            prover = %prover.short_hex(),
            self_stake = %Krl::from_plank(self_collateral),
            "prover unretired"
        );
        Ok(())
    }

    // -----------------------------------------------------------------
    // Read views
    // -----------------------------------------------------------------

    /// Summary of one prover's standing.
    pub fn prover_summary(&self, prover: &AccountId) -> Result<ProverSummary, LedgerError> {
        let record = self.provers.get(prover).ok_or(LedgerError::UnknownProver)?;
        Ok(ProverSummary {
            state: record.state,
            pool_value: record.pool.value(),
            total_shares: record.pool.total_shares(),
            self_collateral: record.self_collateral(prover),
            staker_count: record.staker_count,
            scale_bps: record.scale.bps(),
            unbonding_value: record.unbonding_effective(),
            pending_commission: record.rewards.pending_commission(),
        })
    }

    /// Summary of one staker's position against one prover.
    pub fn stake_summary(
        &self,
        prover: &AccountId,
        staker: &AccountId,
    ) -> Result<StakeSummary, LedgerError> {
        let record = self.provers.get(prover).ok_or(LedgerError::UnknownProver)?;
        let acc = record.rewards.acc_reward_per_share();
        let (active_value, claimable) = match record.positions.get(staker) {
            Some(position) => (
                record.pool.value_of_shares(position.shares),
                position.claimable(acc),
            ),
            None => (0, 0),
        };
        let (pending_value, pending_requests) = match record.queues.get(staker) {
            Some(queue) => {
                let value: Plank = queue
                    .requests()
                    .iter()
                    .map(|r| record.scale.apply(r.raw_units))
                    .sum();
                (value, queue.len())
            }
            None => (0, 0),
        };
        Ok(StakeSummary {
            active_value,
            pending_value,
            pending_requests,
            claimable_rewards: claimable,
        })
    }

    /// Per-request detail of one staker's pending withdrawals.
    pub fn request_details(
        &self,
        prover: &AccountId,
        staker: &AccountId,
        now: u64,
    ) -> Result<Vec<RequestDetail>, LedgerError> {
        let record = self.provers.get(prover).ok_or(LedgerError::UnknownProver)?;
        let details = record
            .queues
            .get(staker)
            .map(|queue| {
                queue
                    .requests()
                    .iter()
                    .map(|r| RequestDetail {
                        id: r.id,
                        value: record.scale.apply(r.raw_units),
                        ready_at: r.ready_at,
                        mature: r.ready_at <= now,
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(details)
    }

    // -----------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------

    /// Serialize the whole ledger for host persistence.
    pub fn to_json(&self) -> Result<String, LedgerError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a ledger from a snapshot produced by [`Self::to_json`].
    pub fn from_json(snapshot: &str) -> Result<Self, LedgerError> {
        Ok(serde_json::from_str(snapshot)?)
    }
}

/// Flip an Active prover to Deactivated when its scale or self-collateral
/// has fallen below the configured bounds. Runs after every slash and
/// after withdrawal-queue changes.
fn evaluate_auto_deactivation(
    config: &StakingConfig,
    prover: &AccountId,
    record: &mut ProverRecord,
) {
    if record.state != ProverState::Active {
        return;
    }
    let scale_bps = record.scale.bps();
    if scale_bps < config.deactivation_scale_threshold_bps {
        record.state = ProverState::Deactivated;
        warn!(
            prover = %prover.short_hex(),
            scale_bps,
            threshold_bps = config.deactivation_scale_threshold_bps,
            "prover auto-deactivated: slashing scale below threshold"
        );
        return;
    }
    let self_stake = record.self_collateral(prover);
    if self_stake < config.min_self_stake {
        record.state = ProverState::Deactivated;
        warn!(
            prover = %prover.short_hex(),
            self_stake = %Krl::from_plank(self_stake),
            minimum = %Krl::from_plank(config.min_self_stake),
            "prover auto-deactivated: self-collateral below minimum"
        );
    }
}
