//! Bounded retry with linear backoff for single-record lookups.
//!
//! Only transient server-side statuses (500 and 503) are retried. Every other
//! error, including network failures and 404s, is returned at once.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Returns `true` if `err` is a transient server error worth another attempt.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::UnexpectedStatus {
            status: 500 | 503,
            ..
        }
    )
}

/// Runs `operation` up to `max_attempts` times.
///
/// After failed attempt `n` (1-based) on a retriable error, sleeps
/// `n * base_delay` before the next attempt:
///
/// | failed attempt | sleep before next |
/// |----------------|-------------------|
/// | 1              | 1 x base          |
/// | 2              | 2 x base          |
///
/// With `max_attempts = 3` the last error is returned after the third
/// failure without a further sleep.
pub(crate) async fn retry_linear<T, F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay = base_delay.saturating_mul(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "transient upstream error; retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
