//! HTTP fetch primitive shared by every scraper.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::clock::Jitter;
use super::retry::{with_backoff, RetryConfig};
use super::user_agent::user_agent_for;
use crate::config::HttpConfig;
use crate::scrapers::ScrapeError;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Shared HTTP client that presents itself as a desktop browser
///
/// Each request takes the next user agent from the pool, keyed by a counter that
/// clones of the same client share.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    request_count: Arc<AtomicUsize>,
}

impl HttpClient {
    /// Create a new HTTP client with default timeouts
    pub fn new() -> Result<Self, ScrapeError> {
        Self::from_config(&HttpConfig::default())
    }

    /// Create a new HTTP client from configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ScrapeError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::from_client(Arc::new(client)))
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>) -> Self {
        Self {
            client,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of requests issued so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    fn next_user_agent(&self) -> &'static str {
        user_agent_for(self.request_count.fetch_add(1, Ordering::Relaxed))
    }

    fn browser_headers(&self, extra: &HeaderMap) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.next_user_agent()));
        headers.insert(ACCEPT, HeaderValue::from_static(HTML_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        for (name, value) in extra {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }

    /// GET a page and return its body
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.fetch_with_headers(url, &HeaderMap::new()).await
    }

    /// GET with extra headers layered over the browser defaults
    ///
    /// Any non-2xx status becomes [`ScrapeError::Status`] carrying the code.
    pub async fn fetch_with_headers(&self, url: &str, extra: &HeaderMap) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .headers(self.browser_headers(extra))
            .send()
            .await
            .map_err(|e| ScrapeError::Network(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", url, status);
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| ScrapeError::Network(format!("Failed to read body of {}: {}", url, e)))
    }

    /// GET, retrying 429 responses with exponential backoff
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        extra: &HeaderMap,
        retry: &RetryConfig,
        jitter: &dyn Jitter,
    ) -> Result<String, ScrapeError> {
        with_backoff(retry, jitter, || self.fetch_with_headers(url, extra)).await
    }
}
