//! Integration test: exactly-once claims across batch boundaries.
//!
//! The dedup guard lives for the process; a credential that succeeded once
//! is skipped in every later batch handled by the same guard, whatever the
//! batch boundaries look like.

use std::sync::Arc;

use sweep_codec::decode_batch;
use sweep_core::{Amount, Identity, SkipReason, SweepConfig, TransferOutcome};
use sweep_engine::{DedupGuard, Orchestrator};
use sweep_ledger::{ILedgerClient, MockLedger};

use sweep_integration_tests::{payload_for, wallet};

const DEST: [u8; 32] = [0xeeu8; 32];

fn test_config() -> SweepConfig {
    SweepConfig {
        destination: Identity::from_bytes(DEST).to_bs58(),
        max_attempts: 1,
        base_delay_ms: 1,
        pacing_ms: 0,
        ..Default::default()
    }
}

fn orchestrator_with_guard(ledger: &Arc<MockLedger>, guard: Arc<DedupGuard>) -> Orchestrator {
    Orchestrator::new(
        Arc::clone(ledger) as Arc<dyn ILedgerClient>,
        guard,
        test_config(),
    )
    .expect("config should be valid")
}

#[tokio::test]
async fn test_same_credential_across_batches_succeeds_once() {
    let w = wallet("repeat");
    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(10));
    ledger.seed_balance(w.identity, Amount(1_000));

    let guard = Arc::new(DedupGuard::new());
    let orch = orchestrator_with_guard(&ledger, Arc::clone(&guard));

    let first = orch.run_batch(decode_batch(&payload_for(&[&w])).unwrap()).await;
    assert!(first.outcomes[0].is_succeeded());

    let second = orch.run_batch(decode_batch(&payload_for(&[&w])).unwrap()).await;
    assert!(matches!(
        second.outcomes[0],
        TransferOutcome::Skipped {
            reason: SkipReason::Duplicate,
            ..
        }
    ));

    let third = orch.run_batch(decode_batch(&payload_for(&[&w])).unwrap()).await;
    assert!(third.outcomes[0].is_skipped());

    // Exactly one broadcast ever happened for this credential.
    assert_eq!(ledger.broadcast_calls(), 1);
    assert!(guard.is_claimed(&w.identity));
}

#[tokio::test]
async fn test_guard_shared_between_orchestrators() {
    let w = wallet("shared");
    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(10));
    ledger.seed_balance(w.identity, Amount(1_000));

    let guard = Arc::new(DedupGuard::new());
    let first = orchestrator_with_guard(&ledger, Arc::clone(&guard));
    let second = orchestrator_with_guard(&ledger, Arc::clone(&guard));

    let result = first.run_batch(decode_batch(&payload_for(&[&w])).unwrap()).await;
    assert!(result.outcomes[0].is_succeeded());

    let result = second.run_batch(decode_batch(&payload_for(&[&w])).unwrap()).await;
    assert!(matches!(
        result.outcomes[0],
        TransferOutcome::Skipped {
            reason: SkipReason::Duplicate,
            ..
        }
    ));
}

#[tokio::test]
async fn test_fresh_guard_allows_reclaim() {
    let w = wallet("fresh");
    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(10));
    ledger.seed_balance(w.identity, Amount(10_000));

    let first = orchestrator_with_guard(&ledger, Arc::new(DedupGuard::new()));
    assert!(first
        .run_batch(decode_batch(&payload_for(&[&w])).unwrap())
        .await
        .outcomes[0]
        .is_succeeded());

    // A new guard models a restarted process: dedup state is gone by design.
    ledger.seed_balance(w.identity, Amount(10_000));
    let second = orchestrator_with_guard(&ledger, Arc::new(DedupGuard::new()));
    assert!(second
        .run_batch(decode_batch(&payload_for(&[&w])).unwrap())
        .await
        .outcomes[0]
        .is_succeeded());
}

#[tokio::test]
async fn test_failed_claim_is_still_consumed() {
    // A claim is made before remote calls, so even a failing item blocks a
    // later retry of the same credential. First-reached terminal state wins.
    let w = wallet("burned");
    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(10));
    ledger.seed_balance(w.identity, Amount(1_000));
    ledger.reject_broadcast_for(w.identity);

    let guard = Arc::new(DedupGuard::new());
    let orch = orchestrator_with_guard(&ledger, Arc::clone(&guard));

    let first = orch.run_batch(decode_batch(&payload_for(&[&w])).unwrap()).await;
    assert!(first.outcomes[0].is_failed());

    let second = orch.run_batch(decode_batch(&payload_for(&[&w])).unwrap()).await;
    assert!(matches!(
        second.outcomes[0],
        TransferOutcome::Skipped {
            reason: SkipReason::Duplicate,
            ..
        }
    ));
}
