//! Publication records produced by the faculty-page, Scholar and Semantic Scholar extractors.

use serde::{Deserialize, Serialize};

/// Where a publication record was extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicationSource {
    #[serde(rename = "Faculty page")]
    FacultyPage,
    #[serde(rename = "Google Scholar")]
    GoogleScholar,
    #[serde(rename = "Semantic Scholar")]
    SemanticScholar,
}

impl PublicationSource {
    /// Returns the display tag stored on each record
    pub fn name(&self) -> &'static str {
        match self {
            PublicationSource::FacultyPage => "Faculty page",
            PublicationSource::GoogleScholar => "Google Scholar",
            PublicationSource::SemanticScholar => "Semantic Scholar",
        }
    }
}

impl std::fmt::Display for PublicationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single publication attributed to a professor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationRecord {
    /// Paper title
    pub title: String,

    /// Author line as presented by the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,

    /// Four-digit publication year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,

    /// Link to the paper (DOI-resolved where possible)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Citation count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cited_by: Option<u32>,

    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,

    pub source: PublicationSource,
}

impl PublicationRecord {
    /// Create a record with only the required fields set
    pub fn new(title: impl Into<String>, source: PublicationSource) -> Self {
        Self {
            title: title.into(),
            authors: None,
            year: None,
            url: None,
            cited_by: None,
            abstract_text: None,
            source,
        }
    }
}

/// Builder for constructing publication records
#[derive(Debug, Clone)]
pub struct PublicationBuilder {
    record: PublicationRecord,
}

impl PublicationBuilder {
    pub fn new(title: impl Into<String>, source: PublicationSource) -> Self {
        Self {
            record: PublicationRecord::new(title, source),
        }
    }

    /// Set the author line; empty strings leave it unset
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.record.authors = non_empty(authors.into());
        self
    }

    pub fn year(mut self, year: Option<u16>) -> Self {
        self.record.year = year;
        self
    }

    pub fn url(mut self, url: Option<String>) -> Self {
        self.record.url = url.and_then(non_empty);
        self
    }

    pub fn cited_by(mut self, count: Option<u32>) -> Self {
        self.record.cited_by = count;
        self
    }

    pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
        self.record.abstract_text = non_empty(text.into());
        self
    }

    pub fn build(self) -> PublicationRecord {
        self.record
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Papers returned by a single publication search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperSearchResult {
    pub papers: Vec<PublicationRecord>,

    /// Scholar author profile link, when the results page exposes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl PaperSearchResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }
}
