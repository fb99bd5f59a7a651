/// Ledger-boundary errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The remote node throttled the request. The only error class the
    /// built-in classifier treats as transient.
    #[error("rate limited by remote node")]
    RateLimited,

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// The anchor token used by the draft is no longer within its validity
    /// window. Not retried; a batch never refreshes its anchor.
    #[error("anchor no longer valid: {0}")]
    StaleAnchor(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// The network rejected the transaction outright.
    #[error("transaction rejected: {0}")]
    Rejected(String),
}

impl LedgerError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    pub fn is_stale_anchor(&self) -> bool {
        matches!(self, Self::StaleAnchor(_))
    }
}

/// Built-in transient classifier: rate limiting is worth retrying, everything
/// else is permanent. Call sites may substitute their own classifier.
pub fn is_transient(err: &LedgerError) -> bool {
    err.is_rate_limited()
}
