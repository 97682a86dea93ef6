use std::{fmt::Display, future::Future, time::Duration};

use tokio::time::sleep;

/// Bounded retry with linear backoff.
///
/// `max_attempts` counts every call, the first one included. The delay before
/// attempt `n + 1` is `backoff_base * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, backoff_base: Duration) -> Self {
        Self {
            max_attempts,
            backoff_base,
        }
    }

    /// Policy for tests and callers that must not sleep.
    pub const fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_base * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2, Duration::from_millis(300))
    }
}

/// Runs `operation` until `should_retry` rejects its outcome or attempts run out.
///
/// The last outcome is returned as-is, so callers decide what an exhausted
/// retry turns into.
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    policy: RetryPolicy,
    operation_name: &str,
    mut operation: F,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&Result<T, E>) -> bool,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let outcome = operation().await;
        if attempt >= max_attempts || !should_retry(&outcome) {
            if attempt > 1 {
                log::debug!("{operation_name} finished after {attempt} attempts");
            }
            return outcome;
        }

        let delay = policy.delay_for(attempt);
        match &outcome {
            Err(e) => log::debug!(
                "{operation_name} failed ({e}), retrying in {}ms (attempt {} of {})",
                delay.as_millis(),
                attempt + 1,
                max_attempts
            ),
            Ok(_) => log::debug!(
                "{operation_name} returned nothing, retrying in {}ms (attempt {} of {})",
                delay.as_millis(),
                attempt + 1,
                max_attempts
            ),
        }

        sleep(delay).await;
        attempt += 1;
    }
}

/// Retry predicate for list fetches: retry on any error or an empty list.
pub fn error_or_empty<T, E>(outcome: &Result<Vec<T>, E>) -> bool {
    match outcome {
        Ok(items) => items.is_empty(),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_linear_delay() {
        let policy = RetryPolicy::new(3, Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_successful_operation() {
        let result = retry_with_backoff(
            RetryPolicy::immediate(3),
            "test",
            || async { Ok::<Vec<i32>, CatalogError>(vec![42]) },
            error_or_empty,
        )
        .await;

        assert_eq!(result, Ok(vec![42]));
    }

    #[tokio::test]
    async fn test_retries_empty_until_data() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = retry_with_backoff(
            RetryPolicy::immediate(3),
            "test",
            move || {
                let count = calls_clone.fetch_add(1, Ordering::SeqCst);
                async move {
                    if count < 2 {
                        Ok::<Vec<i32>, CatalogError>(Vec::new())
                    } else {
                        Ok(vec![7])
                    }
                }
            },
            error_or_empty,
        )
        .await;

        assert_eq!(result, Ok(vec![7]));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_max_attempts_exceeded() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = retry_with_backoff(
            RetryPolicy::immediate(2),
            "test",
            move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                async { Err::<Vec<i32>, CatalogError>(CatalogError::Http("down".to_string())) }
            },
            error_or_empty,
        )
        .await;

        assert_eq!(result, Err(CatalogError::Http("down".to_string())));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_predicate_stops_retry() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_clone = calls.clone();

        let result = retry_with_backoff(
            RetryPolicy::immediate(5),
            "test",
            move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                async { Err::<i32, CatalogError>(CatalogError::Unauthorized("bad".to_string())) }
            },
            |outcome| matches!(outcome, Err(e) if e.is_transient()),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
