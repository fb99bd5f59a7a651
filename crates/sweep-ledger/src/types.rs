use std::fmt;

use serde::{Deserialize, Serialize};
use sweep_core::{Amount, Identity};

/// Time-bounded freshness token required to construct a valid outbound
/// transaction. Fetched once per batch and reused for every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorToken(pub String);

impl AnchorToken {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnchorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unsigned transfer, ready for fee estimation and broadcast.
#[derive(Debug, Clone)]
pub struct TransferDraft {
    pub source: Identity,
    pub destination: Identity,
    pub amount: Amount,
    pub anchor: AnchorToken,
}

impl TransferDraft {
    pub fn new(source: Identity, destination: Identity, amount: Amount, anchor: AnchorToken) -> Self {
        Self {
            source,
            destination,
            amount,
            anchor,
        }
    }

    /// Replace the amount once the fee-adjusted value is known.
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }
}
