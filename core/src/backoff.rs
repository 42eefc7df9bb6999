//! Retry with exponential backoff.
//!
//! [`execute`] drives any fallible async operation. It runs the attempts one
//! after another, sleeps `base_delay * 2^attempt` plus up to 100ms of jitter
//! between them, and hands back the last error untouched once attempts run out.

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::{GenerationError, GenerationResult};

/// Upper bound (exclusive) of the random jitter added to every delay
pub const MAX_JITTER: Duration = Duration::from_millis(100);

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retries: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(700),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration) -> GenerationResult<Self> {
        if retries == 0 {
            return Err(GenerationError::ConfigError(
                "retries must be at least 1".to_string(),
            ));
        }
        if base_delay.is_zero() {
            return Err(GenerationError::ConfigError(
                "base delay must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            retries,
            base_delay,
        })
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Wait before the attempt following zero-based `attempt`
    pub fn delay_for(&self, attempt: u32, jitter: Duration) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .saturating_add(jitter)
    }
}

fn random_jitter() -> Duration {
    let millis = rand::thread_rng().gen_range(0..MAX_JITTER.as_millis() as u64);
    Duration::from_millis(millis)
}

/// Runs `operation` until it succeeds or `policy.retries()` attempts have failed
pub async fn execute<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(attempt = attempt + 1, "Operation recovered after retries");
                }
                return Ok(value);
            }
            Err(e) => {
                if attempt + 1 >= policy.retries {
                    warn!(
                        attempts = policy.retries,
                        error = %e,
                        "Operation failed, giving up"
                    );
                    return Err(e);
                }

                let delay = policy.delay_for(attempt, random_jitter());
                warn!(
                    attempt = attempt + 1,
                    retries = policy.retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tokio::time::Instant;

    #[test]
    fn test_policy_validation() {
        assert!(RetryPolicy::new(0, Duration::from_millis(700)).is_err());
        assert!(RetryPolicy::new(3, Duration::ZERO).is_err());
        let policy = RetryPolicy::new(5, Duration::from_millis(10)).unwrap();
        assert_eq!(policy.retries(), 5);
        assert_eq!(RetryPolicy::default().retries(), 3);
        assert_eq!(
            RetryPolicy::default().base_delay(),
            Duration::from_millis(700)
        );
    }

    #[test]
    fn test_delay_for_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0, Duration::ZERO), Duration::from_millis(700));
        assert_eq!(policy.delay_for(1, Duration::ZERO), Duration::from_millis(1400));
        assert_eq!(
            policy.delay_for(2, Duration::from_millis(42)),
            Duration::from_millis(2842)
        );
    }

    #[test]
    fn test_jitter_bounds() {
        for _ in 0..500 {
            assert!(random_jitter() < MAX_JITTER);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_k_failures() {
        let policy = RetryPolicy::new(4, Duration::from_millis(10)).unwrap();
        let calls = RefCell::new(0u32);

        let result: Result<&str, String> = execute(&policy, || {
            *calls.borrow_mut() += 1;
            let n = *calls.borrow();
            async move {
                if n <= 2 {
                    Err(format!("failure {}", n))
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_returns_last_error() {
        let policy = RetryPolicy::default();
        let calls = RefCell::new(0u32);

        let result: Result<(), String> = execute(&policy, || {
            *calls.borrow_mut() += 1;
            let n = *calls.borrow();
            async move { Err(format!("failure {}", n)) }
        })
        .await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_does_not_sleep() {
        let policy = RetryPolicy::default();
        let start = Instant::now();
        let result: Result<u8, String> = execute(&policy, || async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delays_between_attempts_are_bounded() {
        let policy = RetryPolicy::new(4, Duration::from_millis(700)).unwrap();
        let stamps = RefCell::new(Vec::new());

        let _: Result<(), &str> = execute(&policy, || {
            stamps.borrow_mut().push(Instant::now());
            async { Err("boom") }
        })
        .await;

        let stamps = stamps.into_inner();
        assert_eq!(stamps.len(), 4);
        for (i, pair) in stamps.windows(2).enumerate() {
            let gap = pair[1] - pair[0];
            let floor = Duration::from_millis(700) * 2u32.pow(i as u32);
            assert!(gap >= floor, "gap {:?} below {:?}", gap, floor);
            assert!(gap < floor + MAX_JITTER, "gap {:?} above bound", gap);
        }
    }
}
