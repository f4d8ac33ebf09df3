//! Bounded retry with exponential backoff.
//!
//! Transient failures against the region are retried with doubling
//! delays, a per-delay cap, and a total elapsed-time budget. Once the
//! budget is exhausted the last underlying error is returned; nothing
//! retries forever.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

use crate::config::{
    DEFAULT_RETRY_BASE_DELAY_MS, DEFAULT_RETRY_MAX_DELAY_MS, DEFAULT_RETRY_MAX_ELAPSED_SECS,
};

/// Jitter strategy applied to backoff delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryJitter {
    /// Use the computed delay as-is
    None,
    /// Random delay in `[0, delay]`
    Full,
    /// Random delay in `[delay/2, delay]`
    Equal,
}

/// Backoff policy for a retried operation.
///
/// Delays double per attempt from `base_delay` up to `max_delay`, with
/// jitter applied last. `max_elapsed` bounds the whole operation; the
/// default budget is 60 seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    base_delay: Duration,
    max_delay: Duration,
    max_elapsed: Duration,
    jitter: RetryJitter,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
            max_elapsed: Duration::from_secs(DEFAULT_RETRY_MAX_ELAPSED_SECS),
            jitter: RetryJitter::Equal,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default delays and budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delay before the first retry.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Set the upper bound on a single delay.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Set the total elapsed-time budget.
    pub fn with_max_elapsed(mut self, max_elapsed: Duration) -> Self {
        self.max_elapsed = max_elapsed;
        self
    }

    /// Set the jitter strategy.
    pub fn with_jitter(mut self, jitter: RetryJitter) -> Self {
        self.jitter = jitter;
        self
    }

    /// The total elapsed-time budget.
    pub fn max_elapsed(&self) -> Duration {
        self.max_elapsed
    }

    /// Compute the delay after the given attempt (1-based).
    fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as u64;
        let factor = 1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
        let delay_ms = base_ms
            .saturating_mul(factor)
            .min(self.max_delay.as_millis() as u64);

        Duration::from_millis(self.apply_jitter(delay_ms))
    }

    fn apply_jitter(&self, delay_ms: u64) -> u64 {
        match self.jitter {
            RetryJitter::None => delay_ms,
            RetryJitter::Full => rand::thread_rng().gen_range(0..=delay_ms),
            RetryJitter::Equal => {
                let half = delay_ms / 2;
                half + rand::thread_rng().gen_range(0..=delay_ms - half)
            }
        }
    }
}

/// Run a fallible async operation under a retry policy.
///
/// The operation is retried with backoff until it succeeds or the next
/// delay would exceed the policy's elapsed budget, at which point the
/// last underlying error is returned.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let started = tokio::time::Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let delay = policy.delay_for(attempt);
                if started.elapsed() + delay >= policy.max_elapsed {
                    return Err(err);
                }
                tokio::time::sleep(delay).await;
            }
        }
    }
}
