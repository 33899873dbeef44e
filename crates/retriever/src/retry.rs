//! Retry with exponential backoff for transient HTTP failures.
//!
//! Jitter only spreads retries out in time; it never changes what a
//! successful attempt returns.

use std::future::Future;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Configuration for retry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base delay between retries, doubled on each attempt.
    #[serde(with = "crate::serde_millis", rename = "base_delay_ms")]
    pub base_delay: Duration,
    /// Upper bound on a single delay.
    #[serde(with = "crate::serde_millis", rename = "max_delay_ms")]
    pub max_delay: Duration,
    /// Add 0-50% random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }
}

/// Result of a retried operation.
#[derive(Debug, Clone)]
pub struct RetryResult<T> {
    pub result: Result<T, String>,
    /// Number of attempts made (1 = no retries needed).
    pub attempts: u32,
    pub total_duration: Duration,
    pub succeeded: bool,
}

impl<T> RetryResult<T> {
    pub fn into_result(self) -> Result<T, String> {
        self.result
    }
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// runs out of retries.
///
/// ```ignore
/// let config = RetryConfig::default();
/// let result = execute_with_retry_async(&config, |attempt| async move {
///     fetch(attempt).await.map_err(|e| e.to_string())
/// })
/// .await;
/// ```
pub async fn execute_with_retry_async<T, F, Fut>(
    config: &RetryConfig,
    mut operation: F,
) -> RetryResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, String>>,
{
    let start = Instant::now();
    let mut last_error = None;
    let mut attempts = 0;

    for attempt in 0..=config.max_retries {
        attempts = attempt + 1;
        match operation(attempt).await {
            Ok(value) => {
                return RetryResult {
                    result: Ok(value),
                    attempts,
                    total_duration: start.elapsed(),
                    succeeded: true,
                };
            }
            Err(error) => {
                let retryable = is_retryable_error(&error);
                last_error = Some(error);
                if !retryable {
                    break;
                }
                if attempt < config.max_retries {
                    tokio::time::sleep(calculate_delay(config, attempt)).await;
                }
            }
        }
    }

    RetryResult {
        result: Err(last_error.unwrap_or_else(|| "all retries failed".to_string())),
        attempts,
        total_duration: start.elapsed(),
        succeeded: false,
    }
}

/// Exponential backoff capped at `max_delay`.
fn calculate_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.base_delay.as_millis() as u64;
    let exponential = base.saturating_mul(2_u64.saturating_pow(attempt));
    let delay = exponential.min(config.max_delay.as_millis() as u64);

    if config.jitter {
        let jitter = fastrand::u64(0..=delay / 2);
        Duration::from_millis(delay + jitter)
    } else {
        Duration::from_millis(delay)
    }
}

/// Whether an error message describes a transient failure.
///
/// Client errors (4xx other than 408 and 429) and malformed responses are
/// final; everything else is worth another attempt.
pub fn is_retryable_error(error: &str) -> bool {
    let error_lower = error.to_lowercase();

    if error_lower.contains("timeout")
        || error_lower.contains("timed out")
        || error_lower.contains("connection")
        || error_lower.contains("reset")
        || error_lower.contains("temporarily")
        || error_lower.contains("unavailable")
        || error_lower.contains("503")
        || error_lower.contains("502")
        || error_lower.contains("429")
        || error_lower.contains("504")
        || error_lower.contains("408")
    {
        return true;
    }

    if error_lower.contains("401")
        || error_lower.contains("403")
        || error_lower.contains("404")
        || error_lower.contains("400")
        || error_lower.contains("invalid")
        || error_lower.contains("not found")
    {
        return false;
    }

    true
}
