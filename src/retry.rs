//! Retry logic for remote fetches
//!
//! The stock policy retries forever with a fixed 5 second delay.
//! [`RetryConfig`] can bound the number of retries and switch to exponential
//! backoff with optional jitter.
//!
//! Waiting goes through the [`Sleeper`] trait so tests can count delays
//! without sleeping.
//!
//! # Example
//!
//! ```no_run
//! use rugby_scrape::config::RetryConfig;
//! use rugby_scrape::retry::{IsRetryable, TokioSleeper, with_retry};
//!
//! #[derive(Debug)]
//! struct Flaky;
//!
//! impl std::fmt::Display for Flaky {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "flaky")
//!     }
//! }
//!
//! impl IsRetryable for Flaky {
//!     fn is_retryable(&self) -> bool {
//!         true
//!     }
//! }
//!
//! # async fn example() -> Result<(), Flaky> {
//! let config = RetryConfig::default();
//! let body = with_retry(&config, &TokioSleeper, || async {
//!     Ok::<_, Flaky>("{}".to_string())
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::config::RetryConfig;
use crate::error::Error;
use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Every remote failure is retried, whatever the status code
            Error::Network(_) | Error::HttpStatus { .. } => true,
            // Truncated or garbled page bodies come from the remote side
            Error::Serialization(_) | Error::UnexpectedShape { .. } => true,
            Error::Config { .. }
            | Error::Metadata { .. }
            | Error::Io(_)
            | Error::Csv(_)
            | Error::InvalidPath { .. }
            | Error::InvalidYearRange { .. } => false,
        }
    }
}

/// Something that can wait for a duration
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the Tokio timer
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Execute an async operation, retrying retryable failures per `config`
///
/// Returns the first success, the first non-retryable error, or the last
/// error once `config.max_attempts` retries have been spent. With
/// `max_attempts: None` a retryable failure never ends the loop.
pub async fn with_retry<F, Fut, T, E, S>(
    config: &RetryConfig,
    sleeper: &S,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
    S: Sleeper + ?Sized,
{
    let mut retries: u32 = 0;
    let mut delay = config.delay;

    loop {
        match operation().await {
            Ok(result) => {
                if retries > 0 {
                    tracing::info!(retries, "Operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(e) if e.is_retryable() && config.allows_retry(retries) => {
                retries = retries.saturating_add(1);

                let wait = if config.jitter {
                    add_jitter(delay)
                } else {
                    delay
                };

                tracing::warn!(
                    error = %e,
                    attempt = retries,
                    max_attempts = ?config.max_attempts,
                    delay_ms = wait.as_millis() as u64,
                    "Request failed, retrying"
                );

                sleeper.sleep(wait).await;
                delay = config.next_delay(delay);
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = retries + 1,
                        "Request failed after all retry attempts exhausted"
                    );
                } else {
                    tracing::error!(error = %e, "Request failed with non-retryable error");
                }
                return Err(e);
            }
        }
    }
}

/// Add random jitter to a delay
///
/// The result lies between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter_factor))
}
