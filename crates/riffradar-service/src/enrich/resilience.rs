//! Resilience primitives for tutorial lookups.

use std::future::Future;
use std::time::Duration;

use backon::ExponentialBuilder;

use crate::error::{EnrichError, EnrichResult};

/// Attempts per lookup, first try included.
const MAX_ATTEMPTS: u32 = 3;

/// Retries after the first attempt for transient failures.
const MAX_RETRIES: usize = MAX_ATTEMPTS as usize - 1;

/// Delay before the first retry; doubles on each attempt.
const MIN_RETRY_DELAY: Duration = Duration::from_millis(200);

/// Backoff used for transient upstream failures.
///
/// Kept short: the whole lookup, retries included, still has to fit inside
/// the caller's deadline.
pub fn retry_policy() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(MIN_RETRY_DELAY)
        .with_max_times(MAX_RETRIES)
}

/// Timeout for one HTTP attempt, so every retry can start inside `budget`.
pub fn attempt_timeout(budget: Duration) -> Duration {
    budget / MAX_ATTEMPTS
}

/// Run `fut` with a hard time budget.
///
/// # Errors
/// Returns [`EnrichError::Timeout`] if `budget` elapses first, otherwise
/// whatever `fut` returns.
pub async fn with_deadline<T, F>(source_name: &str, budget: Duration, fut: F) -> EnrichResult<T>
where
    F: Future<Output = EnrichResult<T>>,
{
    tokio::time::timeout(budget, fut)
        .await
        .unwrap_or_else(|_| {
            Err(EnrichError::Timeout {
                source_name: source_name.to_string(),
                seconds: budget.as_secs_f64(),
            })
        })
}
