//! Scrapers that turn faculty pages and bibliographic services into records.
//!
//! - [`DepartmentScraper`]: directory page to professor link candidates
//! - [`ProfessorScraper`]: profile page to a best-effort [`ProfessorProfile`](crate::models::ProfessorProfile)
//! - [`ScholarScraper`]: scraped search-results page, CAPTCHA-aware, never fails
//! - [`SemanticScholarScraper`]: JSON API with authorship filter and TTL cache
//! - [`PublicationDiscovery`]: Semantic Scholar first, Scholar as fallback
//!
//! The two publication sources implement [`PaperSource`] so the discovery policy
//! can be driven by any pair of sources, including [`MockPaperSource`] in tests.

mod department;
mod fallback;
pub mod mock;
mod professor;
mod scholar;
mod semantic;

pub use department::DepartmentScraper;
pub use fallback::{DiscoveryError, DiscoveryResult, PublicationDiscovery, DISCOVERY_FAILED_MESSAGE};
pub use mock::MockPaperSource;
pub use professor::ProfessorScraper;
pub use scholar::{is_captcha_page, ScholarScraper};
pub use semantic::{name_fragments, normalize_query_name, SemanticScholarScraper};

use async_trait::async_trait;

use crate::models::{PaperSearchResult, PublicationSource};

/// A bibliographic service that can list an author's publications
#[async_trait]
pub trait PaperSource: Send + Sync + std::fmt::Debug {
    /// Which source the records come from
    fn source(&self) -> PublicationSource;

    /// Human-readable name of this source
    fn name(&self) -> &str {
        self.source().name()
    }

    /// Search for papers written by the named author
    async fn search_by_name(&self, name: &str) -> Result<PaperSearchResult, ScrapeError>;
}

/// Errors raised while fetching or parsing a page
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Non-2xx response
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// Network or body read error
    #[error("Network error: {0}")]
    Network(String),

    /// Still rate-limited after every retry
    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimit { attempts: u32 },

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Parsing error (JSON, HTML)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ScrapeError {
    /// HTTP status code, when the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            ScrapeError::Status { status, .. } => Some(*status),
            ScrapeError::RateLimit { .. } => Some(429),
            _ => None,
        }
    }

    /// Whether the failure is a 429 or an exhausted rate-limit retry
    pub fn is_rate_limit(&self) -> bool {
        self.status() == Some(429)
    }
}

impl From<reqwest::Error> for ScrapeError {
    fn from(err: reqwest::Error) -> Self {
        ScrapeError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Parse(format!("JSON: {}", err))
    }
}
