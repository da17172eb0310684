//! Utility modules supporting the scrapers.
//!
//! - [`HttpClient`]: browser-like GET with user-agent rotation and 429 backoff
//! - [`RetryConfig`] / [`with_backoff`]: exponential backoff with jitter
//! - [`TtlCache`]: in-memory cache with a fixed time-to-live
//! - [`Clock`] / [`Jitter`]: injectable time and randomness
//! - [`dedup_candidates_by_name`]: name-based dedup for callers that persist results
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use faculty_scout::utils::{with_backoff, HttpClient, RandomJitter, RetryConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let config = RetryConfig::default().max_attempts(3);
//! let body = with_backoff(&config, &RandomJitter, || client.fetch("https://example.edu")).await?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod clock;
mod dedup;
mod http;
mod retry;
mod user_agent;

pub use cache::{cache_key, CacheResult, TtlCache};
pub use clock::{delay_between, Clock, Jitter, ManualClock, NoJitter, RandomJitter, SystemClock};
pub use dedup::{dedup_candidates_by_name, find_name_duplicates, is_known_name, normalize_name};
pub use http::HttpClient;
pub use retry::{
    scholar_retry_config, semantic_scholar_retry_config, with_backoff, RetryConfig,
};
pub use user_agent::{user_agent_for, BROWSER_USER_AGENTS};
