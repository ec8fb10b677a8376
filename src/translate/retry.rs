//! Retry configuration and the retrying translator decorator.
//!
//! [`RetryConfig`] controls exponential backoff for transient upstream
//! errors. [`RetryingTranslator`] wraps any [`Translator`] with it, and both
//! of its operations go through the shared `with_retry()` helper.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::{Detection, Translator};
use crate::Result;
use crate::telemetry;
use crate::types::Language;

/// Exponential backoff settings for transient translation errors.
///
/// ```rust
/// # use dhakhtar::translate::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(4)
///     .initial_delay(Duration::from_millis(100));
/// assert_eq!(config.delay_for_attempt(2), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts including the first request. 1 disables retries. Default: 3.
    pub max_attempts: u32,
    /// Delay before the first retry. Default: 500ms.
    #[serde(rename = "initial_delay_ms", with = "millis")]
    pub initial_delay: Duration,
    /// Cap on the exponential delay. Default: 10s.
    #[serde(rename = "max_delay_ms", with = "millis")]
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    /// Create a config with the defaults: 3 attempts, 500ms initial delay, 10s cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, no retries.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request). Values below 1
    /// behave like 1.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the delay before the first retry; later retries double it.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set the upper bound on any single backoff delay.
    ///
    /// A `retry_after` hint from the upstream service is not capped.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// `initial_delay * 2^attempt`, capped at `max_delay`. `attempt` is 0-indexed.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }

    /// Delay before retry number `attempt + 1`.
    ///
    /// A provider `retry_after` hint (from a `RateLimited` error) takes
    /// precedence over the computed backoff.
    pub fn effective_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.delay_for_attempt(attempt))
    }
}

/// Config files give delays as integer milliseconds.
mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Run `f` until it succeeds, fails permanently or runs out of attempts.
///
/// Only errors for which [`DhakhtarError::is_transient`](crate::DhakhtarError::is_transient)
/// holds are retried. Each retry increments `RETRIES_TOTAL` labelled with
/// `provider` and `operation`. The last error is returned unchanged.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    provider: &str,
    operation: &str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt + 1 < attempts => {
                metrics::counter!(telemetry::RETRIES_TOTAL,
                    "provider" => provider.to_owned(),
                    "operation" => operation.to_owned(),
                )
                .increment(1);
                let delay = config.effective_delay(attempt, e.retry_after());
                warn!(
                    provider,
                    operation,
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Wraps a [`Translator`] with retry on transient errors.
///
/// Authentication failures and 4xx responses other than 429 are returned
/// immediately.
pub struct RetryingTranslator {
    inner: Arc<dyn Translator>,
    config: RetryConfig,
}

impl RetryingTranslator {
    /// Wrap `inner`; `config` applies to both `detect` and `translate`.
    pub fn new(inner: Arc<dyn Translator>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl Translator for RetryingTranslator {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn detect(&self, text: &str) -> Result<Detection> {
        with_retry(&self.config, self.inner.name(), "detect", || {
            self.inner.detect(text)
        })
        .await
    }

    async fn translate(&self, text: &str, source: Language, target: Language) -> Result<String> {
        with_retry(&self.config, self.inner.name(), "translate", || {
            self.inner.translate(text, source, target)
        })
        .await
    }
}
