//! Configuration management.

mod file_config;

pub use file_config::{find_config_file, load_config, ConfigError, CONFIG_FILE_NAME, ENV_PREFIX};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{scholar_retry_config, semantic_scholar_retry_config, RetryConfig};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Scholar search-page scraping
    #[serde(default)]
    pub scholar: ScholarConfig,

    /// Semantic Scholar API
    #[serde(default)]
    pub semantic_scholar: SemanticScholarConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Render as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Backoff settings as they appear in a config file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    pub max_jitter_ms: u64,
}

impl BackoffConfig {
    /// Convert to a runtime policy; a multiplier that is not finite or below 1.0 becomes 1.0
    pub fn to_retry_config(&self) -> RetryConfig {
        let multiplier = if self.multiplier.is_finite() && self.multiplier >= 1.0 {
            self.multiplier
        } else {
            tracing::warn!("Invalid backoff multiplier {}, using 1.0", self.multiplier);
            1.0
        };

        RetryConfig {
            max_attempts: self.max_attempts.max(1),
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            backoff_multiplier: multiplier,
            max_jitter: Duration::from_millis(self.max_jitter_ms),
        }
    }
}

impl From<RetryConfig> for BackoffConfig {
    fn from(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay_ms: config.initial_delay.as_millis() as u64,
            max_delay_ms: config.max_delay.as_millis() as u64,
            multiplier: config.backoff_multiplier,
            max_jitter_ms: config.max_jitter.as_millis() as u64,
        }
    }
}

/// Scholar search-page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScholarConfig {
    #[serde(default = "default_scholar_url")]
    pub base_url: String,

    /// Lower bound of the random pause before each request
    #[serde(default = "default_min_request_delay")]
    pub min_request_delay_ms: u64,

    /// Upper bound of the random pause before each request
    #[serde(default = "default_max_request_delay")]
    pub max_request_delay_ms: u64,

    #[serde(default = "default_scholar_backoff")]
    pub retry: BackoffConfig,
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            base_url: default_scholar_url(),
            min_request_delay_ms: default_min_request_delay(),
            max_request_delay_ms: default_max_request_delay(),
            retry: default_scholar_backoff(),
        }
    }
}

impl ScholarConfig {
    pub fn request_delay(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_request_delay_ms),
            Duration::from_millis(self.max_request_delay_ms.max(self.min_request_delay_ms)),
        )
    }
}

fn default_scholar_url() -> String {
    "https://scholar.google.com".to_string()
}

fn default_min_request_delay() -> u64 {
    1000
}

fn default_max_request_delay() -> u64 {
    3000
}

fn default_scholar_backoff() -> BackoffConfig {
    scholar_retry_config().into()
}

/// Semantic Scholar API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticScholarConfig {
    #[serde(default = "default_semantic_api_base")]
    pub api_base: String,

    /// Optional API key for higher rate limits
    #[serde(default = "default_semantic_api_key")]
    pub api_key: Option<String>,

    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Papers requested per search
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Papers kept after the authorship filter
    #[serde(default = "default_max_papers")]
    pub max_papers: usize,

    #[serde(default = "default_semantic_backoff")]
    pub retry: BackoffConfig,
}

impl Default for SemanticScholarConfig {
    fn default() -> Self {
        Self {
            api_base: default_semantic_api_base(),
            api_key: default_semantic_api_key(),
            cache_ttl_secs: default_cache_ttl(),
            result_limit: default_result_limit(),
            max_papers: default_max_papers(),
            retry: default_semantic_backoff(),
        }
    }
}

impl SemanticScholarConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn default_semantic_api_base() -> String {
    "https://api.semanticscholar.org/graph/v1".to_string()
}

fn default_semantic_api_key() -> Option<String> {
    std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok()
}

fn default_cache_ttl() -> u64 {
    1800 // 30 minutes
}

fn default_result_limit() -> usize {
    40
}

fn default_max_papers() -> usize {
    20
}

fn default_semantic_backoff() -> BackoffConfig {
    semantic_scholar_retry_config().into()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "json" for structured output, anything else for human-readable
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scholar.base_url, "https://scholar.google.com");
        assert_eq!(config.semantic_scholar.cache_ttl(), Duration::from_secs(30 * 60));
        assert_eq!(config.semantic_scholar.result_limit, 40);
        assert_eq!(config.semantic_scholar.max_papers, 20);
        assert_eq!(
            config.scholar.request_delay(),
            (Duration::from_secs(1), Duration::from_secs(3))
        );
    }

    #[test]
    fn test_backoff_round_trips_through_retry_config() {
        let config = Config::default();
        assert_eq!(config.semantic_scholar.retry.to_retry_config(), semantic_scholar_retry_config());
        assert_eq!(config.scholar.retry.to_retry_config(), scholar_retry_config());
    }

    #[test]
    fn test_invalid_multiplier_is_clamped() {
        let jitter = crate::utils::NoJitter;
        for multiplier in [-2.0, 0.5, f64::NAN, f64::INFINITY] {
            let backoff = BackoffConfig {
                multiplier,
                ..BackoffConfig::from(scholar_retry_config())
            };
            let retry = backoff.to_retry_config();
            assert_eq!(retry.backoff_multiplier, 1.0);
            assert_eq!(retry.delay_for(2, &jitter), Duration::from_secs(2));
        }
    }

    #[test]
    fn test_to_toml_contains_sections() {
        let rendered = Config::default().to_toml().unwrap();
        assert!(rendered.contains("[scholar]"));
        assert!(rendered.contains("[semantic_scholar.retry]"));
    }
}
