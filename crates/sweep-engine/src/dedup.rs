use dashmap::DashSet;
use sweep_core::Identity;

/// Process-lifetime record of claimed identities.
///
/// An identity, once claimed, is never released — the set only grows for the
/// life of the process (accepted tradeoff; cross-restart dedup would put an
/// external store behind this same contract). Construct one guard per process
/// and pass it into the orchestrator; tests build isolated instances.
#[derive(Debug, Default)]
pub struct DedupGuard {
    claimed: DashSet<Identity>,
}

impl DedupGuard {
    pub fn new() -> Self {
        Self {
            claimed: DashSet::new(),
        }
    }

    /// Claim an identity. Returns true exactly once per identity per guard.
    /// Check-and-insert is a single atomic operation, so the at-most-once
    /// invariant holds even if batches ever run concurrently.
    pub fn try_claim(&self, identity: &Identity) -> bool {
        self.claimed.insert(*identity)
    }

    pub fn is_claimed(&self, identity: &Identity) -> bool {
        self.claimed.contains(identity)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
