//! Retry utilities with exponential backoff for rate-limited endpoints.

use std::time::Duration;
use tokio::time::sleep;

use super::clock::Jitter;
use crate::scrapers::ScrapeError;

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single delay (jitter included)
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Random extra delay added to each retry
    pub max_jitter: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            backoff_multiplier: 2.0,
            max_jitter: Duration::ZERO,
        }
    }
}

impl RetryConfig {
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// A config that retries immediately (for tests and offline runs)
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            max_jitter: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0 for the first retry)
    pub fn delay_for(&self, retry: u32, jitter: &dyn Jitter) -> Duration {
        let exp = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(retry as i32);
        // Negative, NaN or overflowing products fall back to the cap
        let base = Duration::try_from_secs_f64(exp).unwrap_or(self.max_delay);
        base.saturating_add(jitter.sample(self.max_jitter)).min(self.max_delay)
    }
}

/// Retry policy for the scraped Scholar search page
pub fn scholar_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        initial_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(30),
        backoff_multiplier: 2.0,
        max_jitter: Duration::from_secs(1),
    }
}

/// Retry policy for the Semantic Scholar API, which limits harder: 5s, 15s, 45s
pub fn semantic_scholar_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 4,
        initial_delay: Duration::from_secs(5),
        max_delay: Duration::from_secs(60),
        backoff_multiplier: 3.0,
        max_jitter: Duration::from_secs(2),
    }
}

/// Execute an async operation, retrying only when it reports a rate limit
///
/// Other errors are returned immediately. When every attempt is rate limited the
/// result is [`ScrapeError::RateLimit`].
pub async fn with_backoff<T, F, Fut>(
    config: &RetryConfig,
    jitter: &dyn Jitter,
    mut operation: F,
) -> Result<T, ScrapeError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ScrapeError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("Request succeeded on attempt {}/{}", attempt, max_attempts);
                }
                return Ok(value);
            }
            Err(error) if error.is_rate_limit() => {
                if attempt >= max_attempts {
                    tracing::warn!("Rate limit persisted after {} attempts", attempt);
                    return Err(ScrapeError::RateLimit { attempts: attempt });
                }

                let delay = config.delay_for(attempt - 1, jitter);
                tracing::info!(
                    "Rate-limited, retrying in {:.1}s (attempt {}/{})",
                    delay.as_secs_f64(),
                    attempt + 1,
                    max_attempts
                );
                sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::NoJitter;
    use std::cell::Cell;

    fn too_many_requests() -> ScrapeError {
        ScrapeError::Status {
            url: "https://api.example.org".to_string(),
            status: 429,
        }
    }

    #[test]
    fn test_delay_with_bad_multiplier_uses_cap() {
        let config = RetryConfig {
            backoff_multiplier: -2.0,
            ..scholar_retry_config()
        };
        assert_eq!(config.delay_for(1, &NoJitter), config.max_delay);

        let config = RetryConfig {
            backoff_multiplier: f64::NAN,
            ..scholar_retry_config()
        };
        assert_eq!(config.delay_for(1, &NoJitter), config.max_delay);

        let config = RetryConfig {
            backoff_multiplier: 1e300,
            ..scholar_retry_config()
        };
        assert_eq!(config.delay_for(3, &NoJitter), config.max_delay);
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let config = RetryConfig::immediate(3);
        let calls = Cell::new(0);

        let result = with_backoff(&config, &NoJitter, || {
            calls.set(calls.get() + 1);
            async { Ok("success") }
        })
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_rate_limits() {
        let config = RetryConfig::immediate(4);
        let calls = Cell::new(0);

        let result = with_backoff(&config, &NoJitter, || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    Err(too_many_requests())
                } else {
                    Ok("success")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_exhausted_attempts_report_rate_limit() {
        let config = RetryConfig::immediate(3);
        let calls = Cell::new(0);

        let result: Result<(), ScrapeError> = with_backoff(&config, &NoJitter, || {
            calls.set(calls.get() + 1);
            async { Err(too_many_requests()) }
        })
        .await;

        assert!(matches!(result, Err(ScrapeError::RateLimit { attempts: 3 })));
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_other_errors_are_not_retried() {
        let config = RetryConfig::immediate(5);
        let calls = Cell::new(0);

        let result: Result<(), ScrapeError> = with_backoff(&config, &NoJitter, || {
            calls.set(calls.get() + 1);
            async {
                Err(ScrapeError::Status {
                    url: "https://example.org".to_string(),
                    status: 404,
                })
            }
        })
        .await;

        assert_eq!(result.unwrap_err().status(), Some(404));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_delays_grow_geometrically_and_cap() {
        let config = semantic_scholar_retry_config();
        assert_eq!(config.delay_for(0, &NoJitter), Duration::from_secs(5));
        assert_eq!(config.delay_for(1, &NoJitter), Duration::from_secs(15));
        assert_eq!(config.delay_for(2, &NoJitter), Duration::from_secs(45));
        assert_eq!(config.delay_for(3, &NoJitter), Duration::from_secs(60));
    }

    #[test]
    fn test_semantic_scholar_backs_off_longer_than_scholar() {
        let scholar = scholar_retry_config();
        let semantic = semantic_scholar_retry_config();
        assert!(semantic.initial_delay > scholar.initial_delay);
        assert!((3..=4).contains(&scholar.max_attempts));
        assert!((3..=4).contains(&semantic.max_attempts));
    }
}
