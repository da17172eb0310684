//! Publication discovery across two sources.
//!
//! The API source is asked first. Only when it finds nothing, or fails, is the
//! scraped source tried; if that one fails too the caller gets a single
//! user-facing message instead of two low-level errors.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::{PaperSearchResult, PublicationRecord, PublicationSource};

use super::{PaperSource, ScholarScraper, SemanticScholarScraper};

/// Message shown when no source could be queried
pub const DISCOVERY_FAILED_MESSAGE: &str = "Could not find papers; the source may be rate-limiting requests";

/// Discovery failure
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("{message}")]
    AllSourcesFailed { message: String },
}

/// Papers found for an author and the source that produced them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub source: PublicationSource,

    pub papers: Vec<PublicationRecord>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl DiscoveryResult {
    fn from_search(source: PublicationSource, result: PaperSearchResult) -> Self {
        Self {
            source,
            papers: result.papers,
            profile_url: result.profile_url,
        }
    }
}

/// Primary-then-fallback publication search
#[derive(Debug, Clone)]
pub struct PublicationDiscovery {
    primary: Arc<dyn PaperSource>,
    fallback: Arc<dyn PaperSource>,
}

impl PublicationDiscovery {
    pub fn new(primary: Arc<dyn PaperSource>, fallback: Arc<dyn PaperSource>) -> Self {
        Self { primary, fallback }
    }

    /// Semantic Scholar first, Scholar search page as fallback
    pub fn from_scrapers(semantic: SemanticScholarScraper, scholar: ScholarScraper) -> Self {
        Self::new(Arc::new(semantic), Arc::new(scholar))
    }

    /// Find papers for an author
    pub async fn discover(&self, name: &str) -> Result<DiscoveryResult, DiscoveryError> {
        match self.primary.search_by_name(name).await {
            Ok(result) if !result.is_empty() => {
                return Ok(DiscoveryResult::from_search(self.primary.source(), result));
            }
            Ok(_) => tracing::info!("{} found no papers for {}, trying {}", self.primary.name(), name, self.fallback.name()),
            Err(e) => tracing::warn!("{} failed, trying {}: {}", self.primary.name(), self.fallback.name(), e),
        }

        match self.fallback.search_by_name(name).await {
            Ok(result) => Ok(DiscoveryResult::from_search(self.fallback.source(), result)),
            Err(e) => {
                tracing::error!("All paper search methods failed for {}: {}", name, e);
                Err(DiscoveryError::AllSourcesFailed {
                    message: DISCOVERY_FAILED_MESSAGE.to_string(),
                })
            }
        }
    }
}
