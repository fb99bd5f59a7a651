//! Integration test: full pipeline from transport payload to batch result.
//!
//! Decodes payloads with sweep-codec and drives them through the
//! orchestrator against the in-memory ledger.

use std::sync::Arc;

use serde_json::json;
use sweep_codec::{decode_batch, DecodeError};
use sweep_core::{Amount, FailReason, Identity, SkipReason, SweepConfig, TransferOutcome};
use sweep_engine::{DedupGuard, Orchestrator};
use sweep_ledger::{ILedgerClient, MockLedger};

use sweep_integration_tests::{encode_payload, payload_for, wallet};

const DEST: [u8; 32] = [0xddu8; 32];

/// Config tuned for tests: fast backoff, no pacing.
fn test_config() -> SweepConfig {
    SweepConfig {
        destination: Identity::from_bytes(DEST).to_bs58(),
        max_attempts: 2,
        base_delay_ms: 1,
        pacing_ms: 0,
        ..Default::default()
    }
}

fn orchestrator(ledger: &Arc<MockLedger>, config: SweepConfig) -> Orchestrator {
    Orchestrator::new(
        Arc::clone(ledger) as Arc<dyn ILedgerClient>,
        Arc::new(DedupGuard::new()),
        config,
    )
    .expect("config should be valid")
}

// =========================================================================
// Happy path
// =========================================================================

#[tokio::test]
async fn test_two_wallet_batch_drains_into_destination() {
    let (a, b) = (wallet("ops-a"), wallet("ops-b"));
    let requests = decode_batch(&payload_for(&[&a, &b])).unwrap();

    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(100));
    ledger.seed_balance(a.identity, Amount(10_000));
    ledger.seed_balance(b.identity, Amount(5_000));

    let result = orchestrator(&ledger, test_config()).run_batch(requests).await;

    assert_eq!(result.len(), 2);
    assert_eq!(result.succeeded_count(), 2);
    assert_eq!(result.total_moved(), Amount(9_900 + 4_900));
    assert_eq!(
        ledger.balance(&Identity::from_bytes(DEST)),
        Amount(9_900 + 4_900)
    );
    assert_eq!(ledger.balance(&a.identity), Amount(0));
    assert_eq!(ledger.balance(&b.identity), Amount(0));
    // One anchor served the whole batch.
    assert_eq!(ledger.anchor_calls(), 1);
}

#[tokio::test]
async fn test_outcomes_carry_correlation_identities() {
    let w = wallet("main");
    let requests = decode_batch(&payload_for(&[&w])).unwrap();

    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(10));
    ledger.seed_balance(w.identity, Amount(1_000));

    let result = orchestrator(&ledger, test_config()).run_batch(requests).await;
    let outcome = &result.outcomes[0];
    assert_eq!(outcome.source_hint(), "main");
    assert_eq!(outcome.identity(), Some(&w.identity));
}

// =========================================================================
// Index alignment and per-item isolation
// =========================================================================

#[tokio::test]
async fn test_batch_result_always_matches_request_count() {
    let w = wallet("only");
    let payload = encode_payload(&json!({
        "wallets": [
            { "name": "no-key" },
            { "name": "only", "key": w.key_bs58 },
            { "name": "empty-key", "key": "" },
        ]
    }));
    let requests = decode_batch(&payload).unwrap();
    assert_eq!(requests.len(), 3);

    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(10));
    ledger.seed_balance(w.identity, Amount(1_000));

    let result = orchestrator(&ledger, test_config()).run_batch(requests).await;
    assert_eq!(result.len(), 3);
    assert!(matches!(
        result.outcomes[0],
        TransferOutcome::Skipped {
            reason: SkipReason::MissingCredential,
            ..
        }
    ));
    assert!(result.outcomes[1].is_succeeded());
    assert!(matches!(
        result.outcomes[2],
        TransferOutcome::Skipped {
            reason: SkipReason::MissingCredential,
            ..
        }
    ));
}

#[tokio::test]
async fn test_permanent_error_on_middle_item_is_isolated() {
    let (a, b, c) = (wallet("w-1"), wallet("w-2"), wallet("w-3"));
    let requests = decode_batch(&payload_for(&[&a, &b, &c])).unwrap();

    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(10));
    for w in [&a, &b, &c] {
        ledger.seed_balance(w.identity, Amount(1_000));
    }
    ledger.reject_broadcast_for(b.identity);

    let result = orchestrator(&ledger, test_config()).run_batch(requests).await;
    assert_eq!(result.len(), 3);
    assert!(result.outcomes[0].is_succeeded());
    assert!(matches!(
        result.outcomes[1],
        TransferOutcome::Failed {
            reason: FailReason::Broadcast,
            ..
        }
    ));
    assert!(result.outcomes[2].is_succeeded());
}

// =========================================================================
// Validation before any remote call
// =========================================================================

#[tokio::test]
async fn test_63_byte_credential_fails_without_remote_calls() {
    let payload = encode_payload(&json!({
        "wallets": [{ "name": "short", "key": bs58::encode(&[1u8; 63]).into_string() }]
    }));
    let requests = decode_batch(&payload).unwrap();

    let ledger = Arc::new(MockLedger::new());
    let result = orchestrator(&ledger, test_config()).run_batch(requests).await;

    assert!(matches!(
        result.outcomes[0],
        TransferOutcome::Failed {
            reason: FailReason::InvalidCredentialLength,
            ..
        }
    ));
    assert_eq!(ledger.total_calls(), 0);
}

#[tokio::test]
async fn test_balance_equal_to_fee_is_excluded() {
    let w = wallet("edge");
    let requests = decode_batch(&payload_for(&[&w])).unwrap();

    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(777));
    ledger.seed_balance(w.identity, Amount(777));

    let result = orchestrator(&ledger, test_config()).run_batch(requests).await;
    assert!(matches!(
        result.outcomes[0],
        TransferOutcome::Failed {
            reason: FailReason::InsufficientForFee,
            ..
        }
    ));
    assert_eq!(ledger.broadcast_calls(), 0);
}

// =========================================================================
// Decode boundary
// =========================================================================

#[tokio::test]
async fn test_empty_wallets_payload_is_empty_batch() {
    let requests = decode_batch("(eyJ3YWxsZXRzIjpbXX0=)").unwrap();
    assert!(requests.is_empty());

    let ledger = Arc::new(MockLedger::new());
    let result = orchestrator(&ledger, test_config()).run_batch(requests).await;
    assert_eq!(result.len(), 0);
    assert_eq!(ledger.total_calls(), 0);
}

#[test]
fn test_decode_errors_abort_the_whole_batch() {
    assert!(matches!(decode_batch(""), Err(DecodeError::EmptyInput)));
    assert!(matches!(
        decode_batch("!!!"),
        Err(DecodeError::InvalidEncoding(_))
    ));
    // Valid base64 of plain text: decodable, but not a batch.
    assert!(matches!(
        decode_batch("aGVsbG8="),
        Err(DecodeError::NotStructured)
    ));
}

// =========================================================================
// Egress shape
// =========================================================================

#[tokio::test]
async fn test_batch_result_serializes_for_egress() {
    let w = wallet("ser");
    let requests = decode_batch(&payload_for(&[&w])).unwrap();

    let ledger = Arc::new(MockLedger::new());
    ledger.set_fee(Amount(10));
    ledger.seed_balance(w.identity, Amount(1_000));

    let result = orchestrator(&ledger, test_config()).run_batch(requests).await;
    let value = serde_json::to_value(&result).unwrap();

    assert!(value["batch_id"].is_string());
    assert_eq!(value["outcomes"][0]["status"], "succeeded");
    assert_eq!(value["outcomes"][0]["identity"], w.identity.to_bs58());
    assert_eq!(value["outcomes"][0]["amount_moved"], 990);
    // Secret material never serializes.
    assert!(!value.to_string().contains(&w.key_bs58));
}
