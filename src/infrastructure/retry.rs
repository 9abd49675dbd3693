// src/infrastructure/retry.rs
//
// Resilient single-call executor
//
// CRITICAL RULES:
// - One timeout per attempt; an expired attempt is dropped, which cancels
//   the in-flight call instead of leaving it running
// - Exponential backoff between attempts, no delay after the last one
// - Validation failures are surfaced immediately, they never retry
// - Carries no state across calls; safe to share or rebuild per call site

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::error::FetchError;

/// Upper bound on a single backoff delay, whatever the policy says.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Attempt budget and timing for one logical outbound call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub per_attempt_timeout: Duration,
    /// First retry waits this long; each further retry doubles it, capped
    /// at [`MAX_BACKOFF`]
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            per_attempt_timeout: Duration::from_secs(10),
            base_delay: Duration::from_millis(500),
        }
    }
}

/// Issues a single outbound call with a deadline, retrying on failure with
/// exponential backoff and a bounded attempt count.
pub struct RetryingFetcher {
    policy: RetryPolicy,
}

impl RetryingFetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Run `op` until it succeeds or the attempt budget is exhausted.
    ///
    /// `op` is called once per attempt and must produce a fresh future each
    /// time. On exhaustion the error of the last attempt is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error: Option<FetchError> = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                // Saturate both the exponent and the multiply so a large
                // attempt budget cannot overflow the delay arithmetic
                let delay = self
                    .policy
                    .base_delay
                    .saturating_mul(2u32.saturating_pow(attempt - 2))
                    .min(MAX_BACKOFF);
                log::debug!(
                    "retrying in {:?} (attempt {}/{})",
                    delay,
                    attempt,
                    max_attempts
                );
                sleep(delay).await;
            }

            match timeout(self.policy.per_attempt_timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) => {
                    if !err.is_retryable() {
                        return Err(err);
                    }
                    log::debug!("attempt {}/{} failed: {}", attempt, max_attempts, err);
                    last_error = Some(err);
                }
                Err(_) => {
                    // Dropping the timed-out future cancels the in-flight call
                    log::debug!(
                        "attempt {}/{} timed out after {:?}",
                        attempt,
                        max_attempts,
                        self.policy.per_attempt_timeout
                    );
                    last_error = Some(FetchError::Transient(format!(
                        "attempt timed out after {:?}",
                        self.policy.per_attempt_timeout
                    )));
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| FetchError::Transient("no attempts were made".to_string())))
    }
}
