use std::{future::Future, time::Duration};

use rand::Rng;

use crate::error::{ProviderError, Result};

/// Bounded-retry policy for transient provider failures.
///
/// Only rate-limit and timeout errors qualify (see
/// [`ProviderError::is_retryable`]); everything else fails the call on the
/// first attempt.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub enabled: bool,
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f32,
    /// Fractional jitter applied to each delay, e.g. 0.25 scales a delay by
    /// a uniform factor in [0.75, 1.25].
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            backoff_multiplier: 2.0,
            jitter: 0.25,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    #[must_use]
    pub fn with_backoff_multiplier(mut self, backoff_multiplier: f32) -> Self {
        self.backoff_multiplier = backoff_multiplier;
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }
}

fn next_retry_delay(current: Duration, retry_config: &RetryConfig) -> Duration {
    if current >= retry_config.max_delay {
        return retry_config.max_delay;
    }

    let multiplier = retry_config.backoff_multiplier.max(1.0) as f64;
    let scaled = Duration::from_secs_f64(current.as_secs_f64() * multiplier);
    scaled.min(retry_config.max_delay)
}

fn jittered(delay: Duration, retry_config: &RetryConfig) -> Duration {
    if retry_config.jitter <= 0.0 || delay.is_zero() {
        return delay;
    }
    let factor =
        rand::thread_rng().gen_range(1.0 - retry_config.jitter..=1.0 + retry_config.jitter);
    delay.mul_f64(factor)
}

/// Run `operation`, retrying retryable failures with exponential backoff and
/// jitter until it succeeds, the error is non-retryable, or the attempt
/// budget is spent.
pub async fn execute_with_retry<T, Op, Fut>(retry_config: &RetryConfig, mut operation: Op) -> Result<T>
where
    Op: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if !retry_config.enabled {
        return operation().await;
    }

    let mut attempt: u32 = 0;
    let mut delay = retry_config.initial_delay;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < retry_config.max_retries && error.is_retryable() => {
                attempt += 1;
                let sleep_for = jittered(delay, retry_config);
                tracing::warn!(
                    attempt = attempt,
                    max_retries = retry_config.max_retries,
                    delay_ms = sleep_for.as_millis() as u64,
                    error = %error,
                    "provider request failed with retryable error; retrying"
                );
                tokio::time::sleep(sleep_for).await;
                delay = next_retry_delay(delay, retry_config);
            }
            Err(error) => return Err(error),
        }
    }
}
