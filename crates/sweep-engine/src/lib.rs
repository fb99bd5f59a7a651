//! Sweep transfer orchestration.
//!
//! Sequences payload-decoded requests through the end-to-end batch-drain
//! workflow: dedup claim, balance and fee lookups through the bounded-retry
//! executor, draft construction, and signed broadcast, with per-item failure
//! isolation and optional pacing between items.

pub mod dedup;
pub mod orchestrator;
pub mod retry;

pub use dedup::DedupGuard;
pub use orchestrator::Orchestrator;
pub use retry::{run_with_retry, RetryExhausted, RetryPolicy};
