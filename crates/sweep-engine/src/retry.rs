use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// Bounded-retry configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt; zero means a single attempt.
    pub max_attempts: u32,
    /// Backoff before retry `k` (0-based) is `base_delay * 2^k`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn no_retries() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

/// The last error observed by the executor, tagged with the number of
/// attempts made.
#[derive(Debug, thiserror::Error)]
#[error("after {attempts} attempt(s): {source}")]
pub struct RetryExhausted<E: std::error::Error + 'static> {
    pub attempts: u32,
    #[source]
    pub source: E,
}

impl<E: std::error::Error + 'static> RetryExhausted<E> {
    pub fn into_inner(self) -> E {
        self.source
    }
}

/// Run a fallible operation with bounded retries and exponential backoff.
///
/// Invokes `op` up to `max_attempts + 1` times. After a failed attempt the
/// classifier decides: transient errors back off `base_delay * 2^k` and
/// retry; anything else returns immediately. The executor knows nothing
/// about what `op` does — the same instance drives balance lookups, fee
/// estimation, and broadcasts.
pub async fn run_with_retry<T, E, F, Fut, C>(
    policy: &RetryPolicy,
    is_transient: C,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> bool,
    E: std::error::Error + 'static,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let attempts = attempt + 1;
                if attempt >= policy.max_attempts || !is_transient(&err) {
                    return Err(RetryExhausted {
                        attempts,
                        source: err,
                    });
                }
                let backoff = policy.base_delay * 2u32.saturating_pow(attempt);
                tracing::debug!(
                    attempt = attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "transient failure, backing off"
                );
                sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}
