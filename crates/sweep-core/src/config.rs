use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Amount, Identity};

/// How the transfer amount for each item is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    /// Move the full available balance minus the estimated fee.
    Drain,
    /// Move a fixed configured amount (atomic units).
    Fixed { amount: u64 },
}

/// Deployment configuration for the sweep pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Base58 identity that receives swept funds.
    pub destination: String,
    /// Minimum source balance required to attempt a transfer (atomic units).
    pub min_balance: u64,
    /// Fee assumed when estimation fails after retries (atomic units).
    pub fallback_fee: u64,
    /// Retries after the first attempt, for each remote call.
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds; doubles on each retry.
    pub base_delay_ms: u64,
    /// Pause inserted between successive non-skipped items (milliseconds).
    /// Zero disables pacing.
    pub pacing_ms: u64,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Amount computation strategy. Kept last: the fixed-amount variant
    /// serializes as a TOML table.
    pub amount_policy: AmountPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            // All-zero placeholder identity; deployments must set their own.
            destination: Identity::from_bytes([0u8; 32]).to_bs58(),
            amount_policy: AmountPolicy::Drain,
            min_balance: 1,
            fallback_fee: 5_000,
            max_attempts: 3,
            base_delay_ms: 500,
            pacing_ms: 250,
            log_level: "info".into(),
        }
    }
}

impl SweepConfig {
    /// Parse and validate the destination identity.
    pub fn destination_identity(&self) -> Result<Identity, CoreError> {
        Identity::from_bs58(&self.destination)
    }

    pub fn min_balance(&self) -> Amount {
        Amount(self.min_balance)
    }

    pub fn fallback_fee(&self) -> Amount {
        Amount(self.fallback_fee)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Pacing delay between non-skipped items, if enabled.
    pub fn pacing(&self) -> Option<Duration> {
        (self.pacing_ms > 0).then(|| Duration::from_millis(self.pacing_ms))
    }
}
