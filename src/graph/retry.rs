//! Retry with jittered exponential backoff
//!
//! Each attempt that fails with a retryable [`InventoryError`] sleeps for a
//! random delay drawn uniformly from `[0, min(base * 2^n, max_delay)]` (full
//! jitter) before trying again. Non-retryable errors and the error from the
//! last allowed attempt are returned unchanged.

use log::{error, warn};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

use crate::config::retry;
use crate::error::Result;

/// Retry budget and backoff shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Backoff ceiling before the first retry
    pub base_delay: Duration,
    /// Upper bound for the exponential ceiling
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            base_delay: Duration::from_millis(retry::BASE_DELAY_MS),
            max_delay: Duration::from_millis(retry::MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Policy with the default budget and a custom base delay
    pub fn with_base_delay(base_delay: Duration) -> Self {
        Self {
            base_delay,
            ..Self::default()
        }
    }

    /// Exponential ceiling for the delay after the `retry`-th failure (0-based)
    pub fn backoff_ceiling(&self, retry: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(retry))
            .min(self.max_delay)
    }

    /// Random delay in `[0, backoff_ceiling(retry)]`
    pub fn jittered_delay(&self, retry: u32) -> Duration {
        full_jitter(self.backoff_ceiling(retry))
    }
}

fn full_jitter(ceiling: Duration) -> Duration {
    let factor: f64 = rand::thread_rng().gen_range(0.0..=1.0);
    ceiling.mul_f64(factor)
}

/// Run `operation` until it succeeds, fails permanently, or the budget is spent
///
/// `label` names the operation in log records.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    log::info!("{} succeeded on attempt {}/{}", label, attempt, max_attempts);
                }
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                let delay = policy.jittered_delay(attempt - 1);
                warn!(
                    "{} failed (attempt {}/{}), retrying in {}ms: {}",
                    label,
                    attempt,
                    max_attempts,
                    delay.as_millis(),
                    e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                if e.is_retryable() {
                    error!("{} failed after {} attempts: {}", label, attempt, e);
                } else {
                    error!("{} failed with non-retryable error: {}", label, e);
                }
                return Err(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::with_base_delay(Duration::from_millis(1))
    }

    fn http(status: u16) -> InventoryError {
        InventoryError::Http {
            status,
            message: "test".to_string(),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_ceiling_doubles() {
        let policy = RetryPolicy::with_base_delay(Duration::from_millis(100));
        assert_eq!(policy.backoff_ceiling(0), Duration::from_millis(100));
        assert_eq!(policy.backoff_ceiling(1), Duration::from_millis(200));
        assert_eq!(policy.backoff_ceiling(2), Duration::from_millis(400));
        assert_eq!(policy.backoff_ceiling(3), Duration::from_millis(800));
    }

    #[test]
    fn test_backoff_ceiling_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_ceiling(10), policy.max_delay);
        assert_eq!(policy.backoff_ceiling(u32::MAX), policy.max_delay);
    }

    #[test]
    fn test_jittered_delay_within_bounds() {
        let policy = RetryPolicy::with_base_delay(Duration::from_millis(50));
        for retry in 0..4 {
            let ceiling = policy.backoff_ceiling(retry);
            for _ in 0..50 {
                assert!(policy.jittered_delay(retry) <= ceiling);
            }
        }
    }

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = with_retry(&fast_policy(), "op", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, InventoryError>(7)
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result = with_retry(&fast_policy(), "op", move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            if n < 2 {
                Err(http(503))
            } else {
                Ok("done")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = with_retry(&fast_policy(), "op", move || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Err(http(500 + n as u16))
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(result.unwrap_err().status(), Some(504));
    }

    #[tokio::test]
    async fn test_permanent_error_stops_immediately() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<()> = with_retry(&fast_policy(), "op", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(http(404))
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err().status(), Some(404));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_runs_once() {
        let policy = RetryPolicy {
            max_attempts: 0,
            ..fast_policy()
        };
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let _: Result<()> = with_retry(&policy, "op", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(http(503))
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
