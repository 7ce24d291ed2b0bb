use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::clock::Clock;
use crate::config::BackoffConfig;

/// Bounded retry with exponential backoff
///
/// Attempts are capped; delays double from the base up to the configured
/// maximum. Sleeping goes through the injected [`Clock`] so tests never wait.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(config: &BackoffConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Backoff delay after the given 1-based attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Run `call`, retrying failures `retryable` accepts until the attempt
    /// budget is spent; the final error is returned unchanged
    pub async fn retry<T, E, F, Fut, P>(
        &self,
        operation: &str,
        clock: &dyn Clock,
        mut call: F,
        retryable: P,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 1;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_attempts && retryable(&error) => {
                    let delay = self.delay_after(attempt);
                    warn!(
                        operation = %operation,
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient failure, backing off before retry"
                    );
                    clock.sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
