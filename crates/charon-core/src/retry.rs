//! Retry wrapper for agent calls
//!
//! Wraps each attempt in a timeout and retries transient failures with
//! exponential backoff. Permanent failures (bad input, unknown task)
//! return immediately without burning attempts.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Timeout applied to each individual attempt
    pub per_attempt_timeout: Duration,
    /// Initial delay between retries
    pub initial_backoff: Duration,
    /// Maximum delay between retries
    pub max_backoff: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Add random jitter to delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            per_attempt_timeout: Duration::from_secs(120),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts. Clamped to at least one.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn with_per_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.per_attempt_timeout = timeout;
        self
    }

    /// Set initial backoff delay
    #[must_use]
    pub fn with_initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    /// Set maximum backoff delay
    #[must_use]
    pub fn with_max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Set backoff multiplier
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Enable or disable jitter
    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Calculate delay before the retry that follows `attempt`
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_delay = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32 - 1);

        let delay_ms = base_delay.min(self.max_backoff.as_millis() as f64) as u64;

        let final_delay = if self.jitter {
            // Add up to 25% jitter
            let jitter_range = delay_ms / 4;
            delay_ms + rand_jitter(jitter_range)
        } else {
            delay_ms
        };

        Duration::from_millis(final_delay)
    }
}

/// Simple pseudo-random jitter (avoid adding rand crate dependency)
fn rand_jitter(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0);
    nanos % max
}

/// Execute an async operation under the retry policy.
///
/// Each attempt is bounded by the policy's per-attempt timeout; a
/// timed-out attempt counts as a transient failure. Only transient
/// errors are retried. When the attempt budget runs out the last
/// error is returned wrapped in [`Error::RetriesExhausted`] so the
/// caller can still inspect the underlying cause.
pub async fn execute_with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 1..=policy.max_attempts {
        let started = std::time::Instant::now();
        let outcome = match tokio::time::timeout(policy.per_attempt_timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(Error::BackendTimeout {
                elapsed_secs: started.elapsed().as_secs_f64(),
            }),
        };

        match outcome {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt = attempt, "Operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                let should_retry = attempt < policy.max_attempts && e.is_transient();
                if should_retry {
                    let delay = policy.calculate_delay(attempt);
                    warn!(
                        attempt = attempt,
                        max_attempts = policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Operation failed, retrying"
                    );
                    last_error = Some(e);
                    sleep(delay).await;
                } else if e.is_transient() {
                    debug!(attempt = attempt, error = %e, "Attempt budget exhausted");
                    return Err(Error::RetriesExhausted {
                        attempts: attempt,
                        last_error: Box::new(e),
                    });
                } else {
                    debug!(attempt = attempt, error = %e, "Permanent failure, not retrying");
                    return Err(e);
                }
            }
        }
    }

    // The loop always returns: success, permanent failure, or
    // exhaustion on the final attempt. Kept for totality.
    Err(Error::RetriesExhausted {
        attempts: policy.max_attempts,
        last_error: Box::new(
            last_error.unwrap_or_else(|| Error::Internal("retry loop made no attempts".into())),
        ),
    })
}
