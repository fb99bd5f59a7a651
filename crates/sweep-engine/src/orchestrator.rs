use std::sync::Arc;

use chrono::Utc;
use tokio::time::sleep;

use sweep_core::{
    Amount, AmountPolicy, BatchId, BatchResult, CoreError, FailReason, Identity, SkipReason,
    SweepConfig, TransferOutcome, TransferRequest,
};
use sweep_ledger::{is_transient, AnchorToken, ILedgerClient, TransferDraft};

use crate::dedup::DedupGuard;
use crate::retry::{run_with_retry, RetryPolicy};

/// Memoized per-batch anchor: unset, or fetched with the recorded result.
/// The anchor is fetched at most once per batch — a failed fetch is not
/// retried for later items, and a stale anchor is never refreshed mid-batch.
type AnchorMemo = Option<Option<AnchorToken>>;

/// Sequences decoded transfer requests through the end-to-end batch-drain
/// workflow against one ledger client.
///
/// Items are processed strictly sequentially; each item's failure is
/// isolated into its own outcome and never aborts its siblings. The dedup
/// guard is shared across every batch handled by this process instance.
pub struct Orchestrator {
    ledger: Arc<dyn ILedgerClient>,
    dedup: Arc<DedupGuard>,
    config: SweepConfig,
    destination: Identity,
    policy: RetryPolicy,
}

impl Orchestrator {
    /// Build an orchestrator, validating the configured destination up front.
    pub fn new(
        ledger: Arc<dyn ILedgerClient>,
        dedup: Arc<DedupGuard>,
        config: SweepConfig,
    ) -> Result<Self, CoreError> {
        let destination = config.destination_identity()?;
        let policy = RetryPolicy::new(config.max_attempts, config.base_delay());
        Ok(Self {
            ledger,
            dedup,
            config,
            destination,
            policy,
        })
    }

    /// Drain one batch. The returned outcomes are index-aligned with the
    /// input requests, whatever happens to individual items.
    pub async fn run_batch(&self, requests: Vec<TransferRequest>) -> BatchResult {
        let batch_id = BatchId::new();
        tracing::info!(
            batch_id = %batch_id,
            requests = requests.len(),
            ledger = self.ledger.client_id(),
            "starting sweep batch"
        );

        let total = requests.len();
        let mut anchor: AnchorMemo = None;
        let mut outcomes = Vec::with_capacity(total);

        for (index, request) in requests.into_iter().enumerate() {
            let outcome = self.process_item(&batch_id, request, &mut anchor).await;
            let pace_after = !outcome.is_skipped() && index + 1 < total;
            outcomes.push(outcome);
            if pace_after {
                if let Some(pacing) = self.config.pacing() {
                    sleep(pacing).await;
                }
            }
        }

        let result = BatchResult::new(batch_id, outcomes);
        tracing::info!(
            batch_id = %batch_id,
            succeeded = result.succeeded_count(),
            failed = result.failed_count(),
            skipped = result.skipped_count(),
            moved = %result.total_moved(),
            "sweep batch complete"
        );
        result
    }

    /// Fetch the batch anchor on first use; afterwards replay the recorded
    /// result, successful or not.
    async fn batch_anchor(&self, batch_id: &BatchId, memo: &mut AnchorMemo) -> Option<AnchorToken> {
        match memo {
            Some(cached) => cached.clone(),
            None => {
                let fetched =
                    match run_with_retry(&self.policy, is_transient, || self.ledger.latest_anchor())
                        .await
                    {
                        Ok(anchor) => {
                            tracing::debug!(batch_id = %batch_id, anchor = %anchor, "fetched batch anchor");
                            Some(anchor)
                        }
                        Err(e) => {
                            tracing::warn!(
                                batch_id = %batch_id,
                                attempts = e.attempts,
                                error = %e.source,
                                "anchor fetch failed, items requiring it will fail"
                            );
                            None
                        }
                    };
                *memo = Some(fetched.clone());
                fetched
            }
        }
    }

    /// Drive one request through the per-item state machine. The first
    /// terminal state reached wins; the credential is dropped (and zeroized)
    /// when this returns.
    async fn process_item(
        &self,
        batch_id: &BatchId,
        request: TransferRequest,
        anchor: &mut AnchorMemo,
    ) -> TransferOutcome {
        let TransferRequest {
            credential,
            source_hint,
        } = request;

        let Some(credential) = credential else {
            return TransferOutcome::Skipped {
                source_hint,
                reason: SkipReason::MissingCredential,
            };
        };

        let identity = match credential.derive_identity() {
            Ok(identity) => identity,
            Err(CoreError::InvalidCredentialLength { actual, .. }) => {
                tracing::warn!(batch_id = %batch_id, hint = %source_hint, actual, "credential has invalid length");
                return TransferOutcome::Failed {
                    source_hint,
                    identity: None,
                    reason: FailReason::InvalidCredentialLength,
                };
            }
            Err(e) => {
                tracing::warn!(batch_id = %batch_id, hint = %source_hint, error = %e, "credential rejected");
                return TransferOutcome::Failed {
                    source_hint,
                    identity: None,
                    reason: FailReason::InvalidCredential,
                };
            }
        };

        if !self.dedup.try_claim(&identity) {
            tracing::info!(batch_id = %batch_id, identity = %identity, "identity already claimed, skipping");
            return TransferOutcome::Skipped {
                source_hint,
                reason: SkipReason::Duplicate,
            };
        }

        let Some(anchor) = self.batch_anchor(batch_id, anchor).await else {
            return TransferOutcome::Failed {
                source_hint,
                identity: Some(identity),
                reason: FailReason::AnchorUnavailable,
            };
        };

        let balance = match run_with_retry(&self.policy, is_transient, || {
            self.ledger.balance_of(&identity)
        })
        .await
        {
            Ok(balance) => balance,
            Err(e) => {
                tracing::warn!(
                    batch_id = %batch_id,
                    identity = %identity,
                    attempts = e.attempts,
                    error = %e.source,
                    "balance lookup failed"
                );
                return TransferOutcome::Failed {
                    source_hint,
                    identity: Some(identity),
                    reason: FailReason::BalanceLookup,
                };
            }
        };

        if balance < self.config.min_balance() {
            tracing::info!(batch_id = %batch_id, identity = %identity, balance = %balance, "balance below minimum");
            return TransferOutcome::Failed {
                source_hint,
                identity: Some(identity),
                reason: FailReason::InsufficientBalance,
            };
        }

        // The fee is estimated against a provisional draft carrying the full
        // balance; the final amount depends on the fee under the drain policy.
        let draft = TransferDraft::new(identity, self.destination, balance, anchor);
        let fee = match run_with_retry(&self.policy, is_transient, || {
            self.ledger.estimate_fee(&draft)
        })
        .await
        {
            Ok(fee) => fee,
            Err(e) => {
                tracing::warn!(
                    batch_id = %batch_id,
                    identity = %identity,
                    attempts = e.attempts,
                    error = %e.source,
                    fallback = %self.config.fallback_fee(),
                    "fee estimation failed, applying fallback fee"
                );
                self.config.fallback_fee()
            }
        };

        let Some(amount) = self.transfer_amount(balance, fee) else {
            tracing::info!(batch_id = %batch_id, identity = %identity, balance = %balance, fee = %fee, "balance cannot cover amount plus fee");
            return TransferOutcome::Failed {
                source_hint,
                identity: Some(identity),
                reason: FailReason::InsufficientForFee,
            };
        };
        let draft = draft.with_amount(amount);

        match run_with_retry(&self.policy, is_transient, || {
            self.ledger.sign_and_broadcast(&draft, &credential)
        })
        .await
        {
            Ok(confirmation) => {
                tracing::info!(
                    batch_id = %batch_id,
                    identity = %identity,
                    amount = %amount,
                    confirmation = %confirmation,
                    "transfer confirmed"
                );
                TransferOutcome::Succeeded {
                    source_hint,
                    identity,
                    confirmation,
                    amount_moved: amount,
                    confirmed_at: Utc::now(),
                }
            }
            Err(e) => {
                let reason = if e.source.is_stale_anchor() {
                    FailReason::StaleAnchor
                } else {
                    FailReason::Broadcast
                };
                tracing::warn!(
                    batch_id = %batch_id,
                    identity = %identity,
                    attempts = e.attempts,
                    error = %e.source,
                    "broadcast failed"
                );
                TransferOutcome::Failed {
                    source_hint,
                    identity: Some(identity),
                    reason,
                }
            }
        }
    }

    /// Amount to move under the configured policy, or `None` when the
    /// balance does not strictly cover it (exclusive boundary: a balance
    /// exactly equal to the fee is insufficient).
    fn transfer_amount(&self, balance: Amount, fee: Amount) -> Option<Amount> {
        match self.config.amount_policy {
            AmountPolicy::Drain => balance.checked_sub(fee).filter(|a| !a.is_zero()),
            AmountPolicy::Fixed { amount } => {
                let required = Amount(amount).checked_add(fee)?;
                (balance > required).then_some(Amount(amount))
            }
        }
    }
}
