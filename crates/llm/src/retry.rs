//! Explicit retry policy for provider calls.
//!
//! Retry belongs to the provider boundary, not the orchestrator: the
//! pipeline issues each call exactly once and callers that want retry
//! compose a [`RetryPolicy`] around the call site.  The policy retries
//! only errors its predicate marks transient, with exponential backoff
//! capped at a maximum delay.

use std::time::Duration;

use crate::provider::{ChatMessage, CompletionError, CompletionProvider};

/// Tunable retry parameters.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and policy.
///
/// The result is clamped to [`RetryPolicy::max_delay`].
pub fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_delay)
}

impl RetryPolicy {
    /// Run a completion call under this policy.
    ///
    /// Non-retryable errors (per [`CompletionError::is_retryable`]) and
    /// the final attempt's error are returned as-is.
    pub async fn complete(
        &self,
        provider: &dyn CompletionProvider,
        messages: &[ChatMessage],
    ) -> Result<String, CompletionError> {
        let attempts = self.max_attempts.max(1);
        let mut delay = self.initial_delay;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match provider.complete(messages).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying completion call",
                    );
                    tokio::time::sleep(delay).await;
                    delay = next_delay(delay, self);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
