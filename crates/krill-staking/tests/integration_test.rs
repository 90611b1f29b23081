// crates/krill-staking/tests/integration_test.rs
//
// End-to-end flows through the staking ledger's public API: registration,
// delegation, reward accrual, slashing across in-flight withdrawals, the
// lifecycle state machine, and the read views.

use krill_core::error::LedgerError;
use krill_core::identity::AccountId;
use krill_core::units::PLANK_PER_KRL;
use krill_staking::config::StakingConfig;
use krill_staking::ledger::StakingLedger;
use krill_staking::lifecycle::ProverState;

const KRL: u64 = PLANK_PER_KRL;

fn account(tag: u64) -> AccountId {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&tag.to_le_bytes());
    AccountId::from_bytes(bytes)
}

fn admin() -> AccountId {
    account(u64::MAX)
}

fn slasher() -> AccountId {
    account(u64::MAX - 1)
}

fn reward_source() -> AccountId {
    account(u64::MAX - 2)
}

fn ledger_with(config: StakingConfig) -> StakingLedger {
    StakingLedger::new(config, admin(), slasher(), reward_source())
}

fn base_config() -> StakingConfig {
    StakingConfig {
        unbond_delay_blocks: 10,
        min_self_stake: 100 * KRL,
        min_withdrawal: KRL,
        max_slash_per_call_bps: 5_000,
        min_scale_floor_bps: 100,
        deactivation_scale_threshold_bps: 5_000,
        max_pending_requests: 8,
    }
}

#[test]
fn test_delegation_rewards_and_exit() {
    let mut ledger = ledger_with(base_config());
    let prover = account(1);
    let alice = account(2);
    let bob = account(3);

    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.stake(&prover, &alice, 100 * KRL).unwrap();
    ledger.stake(&prover, &bob, 300 * KRL).unwrap();

    let summary = ledger.prover_summary(&prover).unwrap();
    assert_eq!(summary.pool_value, 500 * KRL);
    assert_eq!(summary.staker_count, 3);

    // 50 KRL over 500 KRL of shares: exactly proportional
    let (commission, to_stakers) = ledger
        .add_rewards(&reward_source(), &prover, 50 * KRL)
        .unwrap();
    assert_eq!(commission, 0);
    assert_eq!(to_stakers, 50 * KRL);

    assert_eq!(ledger.claim_rewards(&prover, &alice).unwrap(), 10 * KRL);
    assert_eq!(ledger.claim_rewards(&prover, &bob).unwrap(), 30 * KRL);
    assert_eq!(ledger.claim_rewards(&prover, &prover).unwrap(), 10 * KRL);
    // A second claim finds nothing
    assert_eq!(ledger.claim_rewards(&prover, &alice).unwrap(), 0);

    // Alice exits in full
    ledger.request_withdraw_all(&prover, &alice, 100).unwrap();
    let paid = ledger.complete_withdraw(&prover, &alice, 110).unwrap();
    assert_eq!(paid, 100 * KRL);

    let alice_summary = ledger.stake_summary(&prover, &alice).unwrap();
    assert_eq!(alice_summary.active_value, 0);
    assert_eq!(alice_summary.pending_value, 0);
    assert_eq!(ledger.prover_summary(&prover).unwrap().staker_count, 2);
}

#[test]
fn test_rewards_settle_before_share_changes() {
    let mut ledger = ledger_with(base_config());
    let prover = account(1);
    let alice = account(2);
    let bob = account(3);

    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.stake(&prover, &alice, 100 * KRL).unwrap();

    // Rewards injected before Bob joins belong to the prover and Alice only
    ledger
        .add_rewards(&reward_source(), &prover, 20 * KRL)
        .unwrap();
    ledger.stake(&prover, &bob, 200 * KRL).unwrap();

    assert_eq!(ledger.claim_rewards(&prover, &bob).unwrap(), 0);
    assert_eq!(ledger.claim_rewards(&prover, &alice).unwrap(), 10 * KRL);
}

#[test]
fn test_slash_reaches_pool_and_inflight_withdrawals() {
    let mut ledger = ledger_with(base_config());
    let prover = account(1);
    let alice = account(2);
    let bob = account(3);

    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.stake(&prover, &alice, 100 * KRL).unwrap();
    ledger.stake(&prover, &bob, 100 * KRL).unwrap();

    // Alice files at full scale
    ledger
        .request_withdraw(&prover, &alice, 50 * KRL, 0)
        .unwrap();

    // -30%: scale 10_000 -> 7_000
    ledger.slash(&slasher(), &prover, 3_000).unwrap();

    // Bob files at the lowered scale
    ledger.request_withdraw(&prover, &bob, 28 * KRL, 1).unwrap();

    // -25%: scale 7_000 -> 5_250
    ledger.slash(&slasher(), &prover, 2_500).unwrap();
    assert_eq!(ledger.prover_summary(&prover).unwrap().scale_bps, 5_250);

    // Each request pays value * scale_at_completion / scale_at_request:
    //   Alice: 50 * 5250/10000 = 26.25 KRL
    //   Bob:   28 * 5250/7000  = 21 KRL
    let alice_paid = ledger.complete_withdraw(&prover, &alice, 20).unwrap();
    let bob_paid = ledger.complete_withdraw(&prover, &bob, 20).unwrap();
    assert_eq!(alice_paid, 26 * KRL + KRL / 4);
    assert_eq!(bob_paid, 21 * KRL);
}

#[test]
fn test_auto_deactivation_scale_boundary() {
    let mut config = base_config();
    config.max_slash_per_call_bps = 6_000;
    config.min_self_stake = 10 * KRL;

    // Landing exactly on the threshold leaves the prover Active
    let mut ledger = ledger_with(config.clone());
    let prover = account(1);
    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.slash(&slasher(), &prover, 5_000).unwrap();
    let summary = ledger.prover_summary(&prover).unwrap();
    assert_eq!(summary.scale_bps, 5_000);
    assert_eq!(summary.state, ProverState::Active);

    // One bps below deactivates
    let mut ledger = ledger_with(config);
    let prover = account(2);
    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.slash(&slasher(), &prover, 5_001).unwrap();
    let summary = ledger.prover_summary(&prover).unwrap();
    assert_eq!(summary.scale_bps, 4_999);
    assert_eq!(summary.state, ProverState::Deactivated);
}

#[test]
fn test_auto_deactivation_on_self_collateral_drop() {
    let mut ledger = ledger_with(base_config());
    let prover = account(1);
    let alice = account(2);
    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.stake(&prover, &alice, 100 * KRL).unwrap();

    // The prover pulls most of its own stake out
    ledger
        .request_withdraw(&prover, &prover, 95 * KRL, 0)
        .unwrap();
    assert_eq!(
        ledger.prover_summary(&prover).unwrap().state,
        ProverState::Deactivated
    );

    // Alice can still exit from a deactivated prover
    ledger.request_withdraw_all(&prover, &alice, 1).unwrap();
    assert_eq!(
        ledger.complete_withdraw(&prover, &alice, 11).unwrap(),
        100 * KRL
    );
}

#[test]
fn test_dust_exit_after_heavy_slash() {
    let mut config = base_config();
    config.max_slash_per_call_bps = 9_500;
    config.min_withdrawal = 10 * KRL;
    config.min_self_stake = 10 * KRL;

    let mut ledger = ledger_with(config);
    let prover = account(1);
    let alice = account(2);
    ledger.register_prover(prover, 1_000 * KRL, 0, 0).unwrap();
    ledger.stake(&prover, &alice, 12 * KRL).unwrap();

    // A normal below-granule request is rejected while the balance covers it
    assert!(matches!(
        ledger.request_withdraw(&prover, &alice, 2 * KRL, 0),
        Err(LedgerError::WithdrawBelowMinimum { .. })
    ));

    // -90%: Alice's balance falls to 1.2 KRL, below the 10 KRL granule
    ledger.slash(&slasher(), &prover, 9_000).unwrap();
    let balance = ledger.stake_summary(&prover, &alice).unwrap().active_value;
    assert_eq!(balance, 12 * KRL / 10);

    // The dust balance may still exit in full
    ledger.request_withdraw_all(&prover, &alice, 0).unwrap();
    let paid = ledger.complete_withdraw(&prover, &alice, 10).unwrap();
    assert_eq!(paid, 12 * KRL / 10);
    assert_eq!(ledger.stake_summary(&prover, &alice).unwrap().active_value, 0);
}

#[test]
fn test_commission_survives_slash() {
    let mut config = base_config();
    config.max_slash_per_call_bps = 6_000;

    let mut ledger = ledger_with(config);
    let prover = account(1);
    let alice = account(2);
    ledger.register_prover(prover, 100 * KRL, 2_000, 0).unwrap();
    ledger.stake(&prover, &alice, 100 * KRL).unwrap();

    let (commission, _) = ledger
        .add_rewards(&reward_source(), &prover, 50 * KRL)
        .unwrap();
    assert_eq!(commission, 10 * KRL);

    // A 60% slash destroys pooled collateral but never earned commission
    ledger.slash(&slasher(), &prover, 6_000).unwrap();
    assert_eq!(
        ledger.prover_summary(&prover).unwrap().pending_commission,
        10 * KRL
    );
    assert_eq!(
        ledger.claim_commission(&prover, &prover).unwrap(),
        10 * KRL
    );
    assert_eq!(ledger.claim_commission(&prover, &prover).unwrap(), 0);
}

#[test]
fn test_retire_unretire_round_trip() {
    let mut ledger = ledger_with(base_config());
    let prover = account(1);
    let alice = account(2);
    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.stake(&prover, &alice, 50 * KRL).unwrap();

    // Wind down the self-position first
    ledger.request_withdraw_all(&prover, &prover, 0).unwrap();
    ledger.complete_withdraw(&prover, &prover, 10).unwrap();
    ledger.retire(&prover, &prover).unwrap();
    assert_eq!(
        ledger.prover_summary(&prover).unwrap().state,
        ProverState::Retired
    );

    // Retired provers accept no stake, but Alice can still leave
    assert!(matches!(
        ledger.stake(&prover, &alice, KRL),
        Err(LedgerError::ProverNotActive(_))
    ));
    ledger.request_withdraw(&prover, &alice, 20 * KRL, 20).unwrap();

    // Coming back requires a qualifying deposit
    ledger.unretire(&prover, &prover, 100 * KRL).unwrap();
    let summary = ledger.prover_summary(&prover).unwrap();
    assert_eq!(summary.state, ProverState::Active);
    assert_eq!(summary.self_collateral, 100 * KRL);

    // Delegation opens again
    ledger.stake(&prover, &alice, KRL).unwrap();
}

#[test]
fn test_admin_lifecycle_controls() {
    let mut ledger = ledger_with(base_config());
    let prover = account(1);
    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();

    assert!(matches!(
        ledger.deactivate(&prover, &prover),
        Err(LedgerError::Unauthorized(_))
    ));
    ledger.deactivate(&admin(), &prover).unwrap();
    assert!(matches!(
        ledger.deactivate(&admin(), &prover),
        Err(LedgerError::InvalidState(_))
    ));

    ledger.reactivate(&admin(), &prover).unwrap();
    assert_eq!(
        ledger.prover_summary(&prover).unwrap().state,
        ProverState::Active
    );
}

#[test]
fn test_unbond_delay_applies_to_new_requests_only() {
    let mut ledger = ledger_with(base_config());
    let prover = account(1);
    let alice = account(2);
    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.stake(&prover, &alice, 100 * KRL).unwrap();

    ledger.request_withdraw(&prover, &alice, 10 * KRL, 0).unwrap();
    ledger.set_unbond_delay(&admin(), 100).unwrap();
    ledger.request_withdraw(&prover, &alice, 10 * KRL, 0).unwrap();

    // Only the first request has matured at block 10
    assert_eq!(ledger.complete_withdraw(&prover, &alice, 10).unwrap(), 10 * KRL);
    assert!(matches!(
        ledger.complete_withdraw(&prover, &alice, 10),
        Err(LedgerError::NoReadyRequests)
    ));
    assert_eq!(
        ledger.complete_withdraw(&prover, &alice, 100).unwrap(),
        10 * KRL
    );
}

#[test]
fn test_request_details_view() {
    let mut ledger = ledger_with(base_config());
    let prover = account(1);
    let alice = account(2);
    ledger.register_prover(prover, 100 * KRL, 0, 0).unwrap();
    ledger.stake(&prover, &alice, 100 * KRL).unwrap();

    let first = ledger.request_withdraw(&prover, &alice, 40 * KRL, 0).unwrap();
    let second = ledger.request_withdraw(&prover, &alice, 20 * KRL, 5).unwrap();
    assert_ne!(first, second);

    // A later slash reprices both requests without rewriting them
    ledger.slash(&slasher(), &prover, 5_000).unwrap();

    let details = ledger.request_details(&prover, &alice, 10).unwrap();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].id, first);
    assert_eq!(details[0].value, 20 * KRL);
    assert!(details[0].mature);
    assert_eq!(details[1].id, second);
    assert_eq!(details[1].value, 10 * KRL);
    assert!(!details[1].mature);

    let summary = ledger.stake_summary(&prover, &alice).unwrap();
    assert_eq!(summary.pending_value, 30 * KRL);
    assert_eq!(summary.pending_requests, 2);
}

#[test]
fn test_views_reject_unknown_prover() {
    let ledger = ledger_with(base_config());
    let ghost = account(99);
    assert!(matches!(
        ledger.prover_summary(&ghost),
        Err(LedgerError::UnknownProver)
    ));
    assert!(matches!(
        ledger.stake_summary(&ghost, &account(1)),
        Err(LedgerError::UnknownProver)
    ));
    assert!(matches!(
        ledger.request_details(&ghost, &account(1), 0),
        Err(LedgerError::UnknownProver)
    ));
}
