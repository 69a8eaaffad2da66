// Retry-with-backoff for outbound actions that hit rate limits.
//
// Every call the action executor makes goes through `retry_with_backoff`, so
// the backoff policy lives in exactly one place.

use super::action_error::ActionError;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    /// Upper bound for a single sleep.
    pub cap: Duration,
    /// Used when the API did not say how long to wait.
    pub default_hint: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            cap: Duration::from_secs(10),
            default_hint: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Sleep before retry number `retry` (1-based): `hint * 2^retry`, capped.
    pub fn delay_for(&self, retry: u32, hint: Option<Duration>) -> Duration {
        let base = hint.unwrap_or(self.default_hint);
        let factor = 2u32.saturating_pow(retry.min(16));
        base.saturating_mul(factor).min(self.cap)
    }
}

/// Run `op`, retrying only on `ActionError::RateLimited`.
///
/// Any other error is returned immediately. When attempts run out the last
/// rate-limit error is returned so the caller can surface a failure notice.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, ActionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ActionError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(ActionError::RateLimited { retry_after }) if attempt < policy.max_attempts => {
                let delay = policy.delay_for(attempt, retry_after);
                tracing::warn!(
                    action = label,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_rate_limited() {
                    tracing::error!(action = label, attempt, "Giving up after rate limits");
                }
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_is_exponential_and_capped() {
        let policy = RetryPolicy::default();
        let hint = Some(Duration::from_secs(1));
        assert_eq!(policy.delay_for(1, hint), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2, hint), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3, hint), Duration::from_secs(8));
        assert_eq!(policy.delay_for(4, hint), Duration::from_secs(10));
        assert_eq!(policy.delay_for(1, None), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(&RetryPolicy::default(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ActionError::RateLimited {
                        retry_after: Some(Duration::from_millis(100)),
                    })
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ActionError::RateLimited { retry_after: None }) }
        })
        .await;

        assert!(matches!(result, Err(ActionError::RateLimited { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ActionError::Forbidden("Missing Permissions".into())) }
        })
        .await;

        assert!(matches!(result, Err(ActionError::Forbidden(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
