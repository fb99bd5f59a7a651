use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use sweep_core::{Amount, ConfirmationId, CredentialMaterial, Identity};

use crate::error::LedgerError;
use crate::traits::ILedgerClient;
use crate::types::{AnchorToken, TransferDraft};

/// In-memory ledger client.
///
/// Keeps a balance table and settles drafts locally: the source is debited
/// amount plus fee, the destination credited, the fee burned. Supports
/// scripted failure injection (rate-limit the next N calls per operation,
/// permanent failures per identity, anchor expiry) and counts every call per
/// operation, so tests can assert on retry behavior and on "no remote call
/// was made" paths. Also drives the CLI rehearsal mode.
pub struct MockLedger {
    balances: DashMap<Identity, u64>,
    fee: AtomicU64,
    anchor_generation: AtomicU64,

    rate_limit_anchor: AtomicU32,
    rate_limit_balance: AtomicU32,
    rate_limit_fee: AtomicU32,
    rate_limit_broadcast: AtomicU32,

    fail_fee_permanently: AtomicBool,
    fail_anchor_permanently: AtomicBool,
    expire_anchor_after: AtomicU32,
    reject_broadcast_for: DashSet<Identity>,
    fail_balance_for: DashSet<Identity>,

    anchor_calls: AtomicU32,
    balance_calls: AtomicU32,
    fee_calls: AtomicU32,
    broadcast_calls: AtomicU32,
    confirmation_counter: AtomicU64,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
            fee: AtomicU64::new(5_000),
            anchor_generation: AtomicU64::new(0),
            rate_limit_anchor: AtomicU32::new(0),
            rate_limit_balance: AtomicU32::new(0),
            rate_limit_fee: AtomicU32::new(0),
            rate_limit_broadcast: AtomicU32::new(0),
            fail_fee_permanently: AtomicBool::new(false),
            fail_anchor_permanently: AtomicBool::new(false),
            expire_anchor_after: AtomicU32::new(0),
            reject_broadcast_for: DashSet::new(),
            fail_balance_for: DashSet::new(),
            anchor_calls: AtomicU32::new(0),
            balance_calls: AtomicU32::new(0),
            fee_calls: AtomicU32::new(0),
            broadcast_calls: AtomicU32::new(0),
            confirmation_counter: AtomicU64::new(0),
        }
    }

    /// Seed or overwrite an identity's balance.
    pub fn seed_balance(&self, identity: Identity, amount: Amount) {
        self.balances.insert(identity, amount.value());
    }

    /// Current balance, zero for unknown identities.
    pub fn balance(&self, identity: &Identity) -> Amount {
        Amount(self.balances.get(identity).map(|v| *v).unwrap_or(0))
    }

    /// Set the fee returned by `estimate_fee` and charged on settlement.
    pub fn set_fee(&self, fee: Amount) {
        self.fee.store(fee.value(), Ordering::SeqCst);
    }

    /// Rate-limit the next `n` calls of the given operation.
    pub fn rate_limit_next_anchor(&self, n: u32) {
        self.rate_limit_anchor.store(n, Ordering::SeqCst);
    }

    pub fn rate_limit_next_balance(&self, n: u32) {
        self.rate_limit_balance.store(n, Ordering::SeqCst);
    }

    pub fn rate_limit_next_fee(&self, n: u32) {
        self.rate_limit_fee.store(n, Ordering::SeqCst);
    }

    pub fn rate_limit_next_broadcast(&self, n: u32) {
        self.rate_limit_broadcast.store(n, Ordering::SeqCst);
    }

    /// Every `estimate_fee` call fails with a permanent error.
    pub fn fail_fee_permanently(&self) {
        self.fail_fee_permanently.store(true, Ordering::SeqCst);
    }

    /// Every `latest_anchor` call fails with a permanent error.
    pub fn fail_anchor_permanently(&self) {
        self.fail_anchor_permanently.store(true, Ordering::SeqCst);
    }

    /// Broadcasts from this identity fail permanently.
    pub fn reject_broadcast_for(&self, identity: Identity) {
        self.reject_broadcast_for.insert(identity);
    }

    /// Balance lookups for this identity fail permanently.
    pub fn fail_balance_for(&self, identity: Identity) {
        self.fail_balance_for.insert(identity);
    }

    /// Invalidate all previously issued anchor tokens.
    pub fn expire_anchor(&self) {
        self.anchor_generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Expire the anchor automatically once `n` broadcasts have gone
    /// through, so a batch can hit a stale anchor mid-flight.
    pub fn expire_anchor_after_broadcasts(&self, n: u32) {
        self.expire_anchor_after.store(n, Ordering::SeqCst);
    }

    pub fn anchor_calls(&self) -> u32 {
        self.anchor_calls.load(Ordering::SeqCst)
    }

    pub fn balance_calls(&self) -> u32 {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn fee_calls(&self) -> u32 {
        self.fee_calls.load(Ordering::SeqCst)
    }

    pub fn broadcast_calls(&self) -> u32 {
        self.broadcast_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> u32 {
        self.anchor_calls() + self.balance_calls() + self.fee_calls() + self.broadcast_calls()
    }

    fn take_rate_limit(counter: &AtomicU32) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn current_anchor(&self) -> AnchorToken {
        AnchorToken::new(format!(
            "anchor-{}",
            self.anchor_generation.load(Ordering::SeqCst)
        ))
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ILedgerClient for MockLedger {
    async fn latest_anchor(&self) -> Result<AnchorToken, LedgerError> {
        self.anchor_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_rate_limit(&self.rate_limit_anchor) {
            return Err(LedgerError::RateLimited);
        }
        if self.fail_anchor_permanently.load(Ordering::SeqCst) {
            return Err(LedgerError::Rpc("anchor source unavailable".into()));
        }
        Ok(self.current_anchor())
    }

    async fn balance_of(&self, identity: &Identity) -> Result<Amount, LedgerError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_rate_limit(&self.rate_limit_balance) {
            return Err(LedgerError::RateLimited);
        }
        if self.fail_balance_for.contains(identity) {
            return Err(LedgerError::Rpc("balance backend unavailable".into()));
        }
        Ok(self.balance(identity))
    }

    async fn estimate_fee(&self, _draft: &TransferDraft) -> Result<Amount, LedgerError> {
        self.fee_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_rate_limit(&self.rate_limit_fee) {
            return Err(LedgerError::RateLimited);
        }
        if self.fail_fee_permanently.load(Ordering::SeqCst) {
            return Err(LedgerError::Rpc("fee oracle unavailable".into()));
        }
        Ok(Amount(self.fee.load(Ordering::SeqCst)))
    }

    async fn sign_and_broadcast(
        &self,
        draft: &TransferDraft,
        credential: &CredentialMaterial,
    ) -> Result<ConfirmationId, LedgerError> {
        let broadcast_seq = self.broadcast_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if Self::take_rate_limit(&self.rate_limit_broadcast) {
            return Err(LedgerError::RateLimited);
        }
        let expire_after = self.expire_anchor_after.load(Ordering::SeqCst);
        if expire_after != 0 && broadcast_seq == expire_after + 1 {
            self.anchor_generation.fetch_add(1, Ordering::SeqCst);
        }
        if self.reject_broadcast_for.contains(&draft.source) {
            return Err(LedgerError::Rejected("node refused transaction".into()));
        }
        if draft.anchor != self.current_anchor() {
            return Err(LedgerError::StaleAnchor(draft.anchor.to_string()));
        }

        let signer = credential
            .derive_identity()
            .map_err(|e| LedgerError::Rejected(e.to_string()))?;
        if signer != draft.source {
            return Err(LedgerError::Rejected(
                "credential does not authorize source".into(),
            ));
        }

        let fee = self.fee.load(Ordering::SeqCst);
        let charged = draft
            .amount
            .value()
            .checked_add(fee)
            .ok_or_else(|| LedgerError::Rejected("amount overflow".into()))?;

        {
            let mut source_balance = self
                .balances
                .get_mut(&draft.source)
                .ok_or_else(|| LedgerError::AccountNotFound(draft.source.to_string()))?;
            if *source_balance < charged {
                return Err(LedgerError::Rejected("insufficient funds".into()));
            }
            *source_balance -= charged;
        }
        *self.balances.entry(draft.destination).or_insert(0) += draft.amount.value();

        let seq = self.confirmation_counter.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(source = %draft.source, amount = %draft.amount, "mock ledger settled draft");
        Ok(ConfirmationId(format!("sig-{seq}")))
    }

    fn client_id(&self) -> &str {
        "lc-mock"
    }
}
