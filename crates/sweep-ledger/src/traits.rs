use async_trait::async_trait;
use sweep_core::{Amount, ConfirmationId, CredentialMaterial, Identity};

use crate::error::LedgerError;
use crate::types::{AnchorToken, TransferDraft};

/// Ledger client interface.
///
/// Each implementation bridges the sweep pipeline to a concrete ledger
/// network client. Connection management, signing internals, and transaction
/// serialization live behind this boundary; every capability is
/// independently fallible.
#[async_trait]
pub trait ILedgerClient: Send + Sync {
    /// Fetch the latest freshness token. Valid for a bounded time window.
    async fn latest_anchor(&self) -> Result<AnchorToken, LedgerError>;

    /// Current balance of the given identity, in atomic units.
    async fn balance_of(&self, identity: &Identity) -> Result<Amount, LedgerError>;

    /// Estimate the network fee for the given draft.
    async fn estimate_fee(&self, draft: &TransferDraft) -> Result<Amount, LedgerError>;

    /// Sign the draft with the given credential and broadcast it, blocking
    /// until network confirmation or failure. Transport-level retries inside
    /// the client are opaque to the caller.
    async fn sign_and_broadcast(
        &self,
        draft: &TransferDraft,
        credential: &CredentialMaterial,
    ) -> Result<ConfirmationId, LedgerError>;

    /// Unique identifier of this client (e.g. "lc-mock").
    fn client_id(&self) -> &str;
}
