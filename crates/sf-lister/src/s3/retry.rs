//! Retry discipline for list requests.
//!
//! Transient faults are retried with exponential backoff; fatal faults
//! (no such bucket) return immediately.

use rand::Rng;
use sf_error::{Error, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{trace, warn};

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries before giving up.
    pub max_retries: u32,
    /// Backoff base; the wait after attempt `i` is `base * 2^i`.
    pub base: Duration,
    /// Whether to add up to 25% jitter to each wait.
    ///
    /// Off by default: synchronized waits are easier to reason about and
    /// reproduce, at the cost of fleets of clients backing off in lockstep.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            base: Duration::from_secs(1),
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Create a retry configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the backoff base.
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    /// Enable or disable jitter.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// The wait after a failed attempt (0-based index).
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        let wait = self.base.saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));

        if self.jitter {
            let jitter_range = wait / 4;
            wait + rand::rng().random_range(Duration::ZERO..=jitter_range)
        } else {
            wait
        }
    }
}

/// Execute `operation` with the configured backoff.
///
/// Transient errors are retried up to `max_retries` times; a fatal error is
/// returned as-is, and exhausting the budget surfaces the last error inside
/// [`Error::RetriesExhausted`].
pub async fn with_backoff<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    for attempt in 0..=config.max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_fatal() => {
                warn!(operation = operation_name, attempt, error = %e, "fatal error");
                return Err(e);
            }
            Err(e) => {
                if attempt >= config.max_retries {
                    return Err(Error::RetriesExhausted {
                        attempts: attempt + 1,
                        last: e.to_string(),
                    });
                }

                let wait = config.backoff_duration(attempt);
                trace!(
                    operation = operation_name,
                    attempt,
                    error = %e,
                    wait_secs = wait.as_secs_f64(),
                    "transient error, backing off"
                );
                sleep(wait).await;
            }
        }
    }

    unreachable!("retry loop returns from its final iteration")
}
