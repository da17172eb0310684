//! Mock paper source for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::{PaperSearchResult, PublicationBuilder, PublicationRecord, PublicationSource};
use crate::scrapers::{PaperSource, ScrapeError};

#[derive(Debug, Clone)]
enum MockResponse {
    Papers(PaperSearchResult),
    Failure(String),
}

/// A paper source that returns a predefined response and counts its calls
#[derive(Debug)]
pub struct MockPaperSource {
    source: PublicationSource,
    response: MockResponse,
    calls: AtomicUsize,
}

impl MockPaperSource {
    /// A source that finds nothing
    pub fn new(source: PublicationSource) -> Self {
        Self::with_result(source, PaperSearchResult::empty())
    }

    pub fn with_result(source: PublicationSource, result: PaperSearchResult) -> Self {
        Self {
            source,
            response: MockResponse::Papers(result),
            calls: AtomicUsize::new(0),
        }
    }

    /// A source that returns these titles
    pub fn with_titles(source: PublicationSource, titles: &[&str]) -> Self {
        let papers = titles.iter().map(|t| make_record(t, source)).collect();
        Self::with_result(source, PaperSearchResult { papers, profile_url: None })
    }

    /// A source whose every search fails with a network error
    pub fn failing(source: PublicationSource, message: impl Into<String>) -> Self {
        Self {
            source,
            response: MockResponse::Failure(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of searches made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaperSource for MockPaperSource {
    fn source(&self) -> PublicationSource {
        self.source
    }

    async fn search_by_name(&self, _name: &str) -> Result<PaperSearchResult, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            MockResponse::Papers(result) => Ok(result.clone()),
            MockResponse::Failure(message) => Err(ScrapeError::Network(message.clone())),
        }
    }
}

/// Helper function to create a publication record for testing
pub fn make_record(title: &str, source: PublicationSource) -> PublicationRecord {
    PublicationBuilder::new(title, source)
        .url(Some(format!("https://papers.example.org/{}", title.to_lowercase().replace(' ', "-"))))
        .build()
}
