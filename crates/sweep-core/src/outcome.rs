use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::types::{Amount, BatchId, ConfirmationId, Identity};

/// Why an item was skipped without touching the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The payload element carried no usable credential field.
    MissingCredential,
    /// The identity was already claimed within this process lifetime.
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "missing credential"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl Serialize for SkipReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Why an item failed. Reason strings are short and never carry secret
/// material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// Credential material was not exactly 64 bytes.
    InvalidCredentialLength,
    /// Credential bytes did not form a valid keypair.
    InvalidCredential,
    /// No anchor token could be fetched for this batch.
    AnchorUnavailable,
    /// Balance lookup failed after retries.
    BalanceLookup,
    /// Balance below the configured minimum.
    InsufficientBalance,
    /// Balance does not strictly cover amount plus fee.
    InsufficientForFee,
    /// Broadcast failed after retries.
    Broadcast,
    /// The batch anchor expired before this item was broadcast.
    StaleAnchor,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentialLength => write!(f, "invalid credential length"),
            Self::InvalidCredential => write!(f, "invalid credential"),
            Self::AnchorUnavailable => write!(f, "anchor unavailable"),
            Self::BalanceLookup => write!(f, "balance lookup"),
            Self::InsufficientBalance => write!(f, "insufficient balance"),
            Self::InsufficientForFee => write!(f, "insufficient for fee"),
            Self::Broadcast => write!(f, "broadcast"),
            Self::StaleAnchor => write!(f, "stale anchor"),
        }
    }
}

impl Serialize for FailReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Terminal result for one transfer request. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    Skipped {
        source_hint: String,
        reason: SkipReason,
    },
    Failed {
        source_hint: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        identity: Option<Identity>,
        reason: FailReason,
    },
    Succeeded {
        source_hint: String,
        identity: Identity,
        confirmation: ConfirmationId,
        amount_moved: Amount,
        confirmed_at: DateTime<Utc>,
    },
}

impl TransferOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn source_hint(&self) -> &str {
        match self {
            Self::Skipped { source_hint, .. }
            | Self::Failed { source_hint, .. }
            | Self::Succeeded { source_hint, .. } => source_hint,
        }
    }

    /// The identity this outcome correlates to, where one could be derived.
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Skipped { .. } => None,
            Self::Failed { identity, .. } => identity.as_ref(),
            Self::Succeeded { identity, .. } => Some(identity),
        }
    }

    /// Short human-readable reason for non-successful outcomes.
    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Skipped { reason, .. } => Some(reason.to_string()),
            Self::Failed { reason, .. } => Some(reason.to_string()),
            Self::Succeeded { .. } => None,
        }
    }
}

/// Ordered outcomes for one batch, index-aligned with the decoded requests.
#[derive(Debug, Serialize)]
pub struct BatchResult {
    pub batch_id: BatchId,
    pub outcomes: Vec<TransferOutcome>,
}

impl BatchResult {
    pub fn new(batch_id: BatchId, outcomes: Vec<TransferOutcome>) -> Self {
        Self { batch_id, outcomes }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    /// Total amount confirmed moved across the batch.
    pub fn total_moved(&self) -> Amount {
        self.outcomes.iter().fold(Amount::ZERO, |acc, o| match o {
            TransferOutcome::Succeeded { amount_moved, .. } => acc.saturating_add(*amount_moved),
            _ => acc,
        })
    }
}
