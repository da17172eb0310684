//! Semantic Scholar API author search.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Deserialize;
use std::sync::Arc;

use crate::config::SemanticScholarConfig;
use crate::models::{PaperSearchResult, PublicationBuilder, PublicationRecord, PublicationSource};
use crate::utils::{cache_key, CacheResult, HttpClient, Jitter, RandomJitter, RetryConfig, TtlCache};

use super::{PaperSource, ScrapeError};

const SEARCH_FIELDS: &str = "title,authors,year,url,citationCount,abstract,externalIds";

/// Fragments this short (initials, particles) are not used for matching
const MIN_FRAGMENT_LEN: usize = 3;

#[derive(Debug, Deserialize)]
struct S2SearchResponse {
    data: Option<Vec<S2Paper>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S2Paper {
    title: Option<String>,
    authors: Option<Vec<S2Author>>,
    year: Option<u16>,
    url: Option<String>,
    citation_count: Option<u32>,
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    external_ids: Option<S2ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct S2Author {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S2ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

/// Rewrite "Last, First" as "First Last"; other names are only trimmed
pub fn normalize_query_name(name: &str) -> String {
    if !name.contains(',') {
        return name.trim().to_string();
    }

    let parts: Vec<&str> = name.split(',').map(str::trim).collect();
    let first = parts.get(1).copied().unwrap_or_default();
    format!("{} {}", first, parts[0]).trim().to_string()
}

/// Lower-cased letter-only tokens longer than two characters
pub fn name_fragments(name: &str) -> Vec<String> {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .filter(|f| f.len() >= MIN_FRAGMENT_LEN)
        .map(String::from)
        .collect()
}

fn is_author(authors: &[S2Author], fragments: &[String]) -> bool {
    authors.iter().any(|author| {
        let name = author.name.as_deref().unwrap_or_default().to_lowercase();
        fragments.iter().all(|f| name.contains(f.as_str()))
    })
}

fn to_record(paper: S2Paper, title: String) -> PublicationRecord {
    let authors = paper.authors.unwrap_or_default();
    let author_line = authors
        .iter()
        .filter_map(|a| a.name.as_deref())
        .collect::<Vec<_>>()
        .join(", ");

    let doi = paper
        .external_ids
        .and_then(|ids| ids.doi)
        .filter(|doi| !doi.trim().is_empty());
    let url = match doi {
        Some(doi) => Some(format!("https://doi.org/{}", doi)),
        None => paper.url,
    };

    PublicationBuilder::new(title, PublicationSource::SemanticScholar)
        .authors(author_line)
        .year(paper.year.filter(|y| *y > 0))
        .url(url)
        .cited_by(paper.citation_count.filter(|n| *n > 0))
        .abstract_text(paper.abstract_text.unwrap_or_default())
        .build()
}

/// Keep papers written by the queried author, up to `max_papers`
fn filter_papers(response: S2SearchResponse, fragments: &[String], max_papers: usize) -> Vec<PublicationRecord> {
    let mut papers = Vec::new();

    for paper in response.data.unwrap_or_default() {
        if papers.len() >= max_papers {
            break;
        }
        let Some(title) = paper.title.clone().filter(|t| !t.trim().is_empty()) else {
            continue;
        };
        if !is_author(paper.authors.as_deref().unwrap_or_default(), fragments) {
            continue;
        }
        papers.push(to_record(paper, title));
    }

    papers
}

/// Semantic Scholar author search with authorship filter and TTL cache
///
/// Results, including empty ones, are cached per lower-cased trimmed name so a
/// name that hit the rate limit is not retried until the entry expires. Clones
/// share the cache.
#[derive(Debug, Clone)]
pub struct SemanticScholarScraper {
    client: HttpClient,
    api_base: String,
    api_key: Option<String>,
    result_limit: usize,
    max_papers: usize,
    retry: RetryConfig,
    jitter: Arc<dyn Jitter>,
    cache: Arc<TtlCache<PaperSearchResult>>,
}

impl SemanticScholarScraper {
    pub fn new(client: HttpClient) -> Self {
        Self::from_config(client, &SemanticScholarConfig::default())
    }

    pub fn from_config(client: HttpClient, config: &SemanticScholarConfig) -> Self {
        Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            result_limit: config.result_limit,
            max_papers: config.max_papers,
            retry: config.retry.to_retry_config(),
            jitter: Arc::new(RandomJitter),
            cache: Arc::new(TtlCache::new(config.cache_ttl())),
        }
    }

    /// Use a shared cache (e.g. one driven by a manual clock)
    pub fn with_cache(mut self, cache: Arc<TtlCache<PaperSearchResult>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn cache(&self) -> &Arc<TtlCache<PaperSearchResult>> {
        &self.cache
    }

    /// Search URL for an already-normalized name
    pub fn search_url(&self, normalized_name: &str) -> String {
        format!(
            "{}/paper/search?query={}&fields={}&limit={}",
            self.api_base,
            urlencoding::encode(&format!("\"{}\"", normalized_name)),
            SEARCH_FIELDS,
            self.result_limit
        )
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.api_key {
            match HeaderValue::from_str(key) {
                Ok(value) => {
                    headers.insert("x-api-key", value);
                }
                Err(_) => tracing::warn!("Ignoring Semantic Scholar API key with invalid characters"),
            }
        }
        headers
    }

    /// Papers authored by `name`; never fails, errors yield an empty result
    pub async fn search_by_name(&self, name: &str) -> PaperSearchResult {
        let key = cache_key(name);
        match self.cache.get(&key) {
            CacheResult::Hit(result) => {
                tracing::info!("Semantic Scholar cache hit for: {} ({} papers)", name, result.len());
                return result;
            }
            CacheResult::Expired => tracing::debug!("Semantic Scholar cache entry expired for: {}", name),
            CacheResult::Miss => {}
        }

        tracing::info!("Searching Semantic Scholar for author: {}", name);
        let normalized = normalize_query_name(name);
        let fragments = name_fragments(&normalized);

        let papers = match self.fetch_search(&normalized).await {
            Ok(response) => filter_papers(response, &fragments, self.max_papers),
            Err(e) if e.is_rate_limit() => {
                tracing::warn!("Semantic Scholar rate limit exceeded after retries: {}", e);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Semantic Scholar search failed: {}", e);
                Vec::new()
            }
        };

        let result = PaperSearchResult {
            papers,
            profile_url: None,
        };
        self.cache.set(&key, result.clone());

        tracing::info!("Found {} papers on Semantic Scholar for {}", result.len(), name);
        result
    }

    async fn fetch_search(&self, normalized_name: &str) -> Result<S2SearchResponse, ScrapeError> {
        let body = self
            .client
            .fetch_with_retry(
                &self.search_url(normalized_name),
                &self.headers(),
                &self.retry,
                self.jitter.as_ref(),
            )
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PaperSource for SemanticScholarScraper {
    fn source(&self) -> PublicationSource {
        PublicationSource::SemanticScholar
    }

    async fn search_by_name(&self, name: &str) -> Result<PaperSearchResult, ScrapeError> {
        Ok(SemanticScholarScraper::search_by_name(self, name).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> S2SearchResponse {
        serde_json::from_str(json).unwrap()
    }

    fn fragments(name: &str) -> Vec<String> {
        name_fragments(&normalize_query_name(name))
    }

    #[test]
    fn test_normalize_query_name() {
        assert_eq!(normalize_query_name("Smith, Jane"), "Jane Smith");
        assert_eq!(normalize_query_name("  Jane Smith "), "Jane Smith");
        assert_eq!(normalize_query_name("Smith,"), "Smith");
    }

    #[test]
    fn test_name_fragments_drop_initials_and_punctuation() {
        assert_eq!(name_fragments("Jane Q. Smith"), vec!["jane", "smith"]);
        assert_eq!(name_fragments("Li Wu"), Vec::<String>::new());
        assert_eq!(fragments("O'Neil, Pat"), vec!["pat", "oneil"]);
    }

    #[test]
    fn test_authorship_filter_and_doi_preference() {
        let json = r#"{"data": [
            {"title": "Raft Revisited", "authors": [{"name": "Jane Smith"}, {"name": "Kim Lee"}],
             "year": 2020, "url": "https://www.semanticscholar.org/paper/1", "citationCount": 12,
             "abstract": "A study.", "externalIds": {"DOI": "10.1000/raft", "CorpusId": 42}},
            {"title": "Someone Else's Paper", "authors": [{"name": "John Smithson"}], "year": 2019},
            {"title": null, "authors": [{"name": "Jane Smith"}]},
            {"title": "No DOI", "authors": [{"name": "Dr. Jane Smith-Jones"}],
             "url": "https://www.semanticscholar.org/paper/3", "citationCount": 0, "externalIds": {}}
        ]}"#;

        let papers = filter_papers(response(json), &fragments("Smith, Jane"), 20);
        let titles: Vec<_> = papers.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Raft Revisited", "No DOI"]);

        let raft = &papers[0];
        assert_eq!(raft.url.as_deref(), Some("https://doi.org/10.1000/raft"));
        assert_eq!(raft.authors.as_deref(), Some("Jane Smith, Kim Lee"));
        assert_eq!(raft.cited_by, Some(12));
        assert_eq!(raft.year, Some(2020));
        assert_eq!(raft.source, PublicationSource::SemanticScholar);

        let no_doi = &papers[1];
        assert_eq!(no_doi.url.as_deref(), Some("https://www.semanticscholar.org/paper/3"));
        assert_eq!(no_doi.cited_by, None);
    }

    #[test]
    fn test_abbreviated_author_is_rejected() {
        // Fragment matching does not expand initials
        let json = r#"{"data": [{"title": "Initials Only", "authors": [{"name": "J. Smith"}]}]}"#;
        assert!(filter_papers(response(json), &fragments("Jane Smith"), 20).is_empty());
    }

    #[test]
    fn test_accumulation_stops_at_max() {
        let papers: Vec<String> = (0..30)
            .map(|i| format!(r#"{{"title": "Paper number {i}", "authors": [{{"name": "Jane Smith"}}]}}"#))
            .collect();
        let json = format!(r#"{{"data": [{}]}}"#, papers.join(","));

        let kept = filter_papers(response(&json), &fragments("Jane Smith"), 20);
        assert_eq!(kept.len(), 20);
        assert_eq!(kept[19].title, "Paper number 19");
    }

    #[test]
    fn test_missing_data_is_empty() {
        assert!(filter_papers(response("{}"), &fragments("Jane Smith"), 20).is_empty());
        assert!(filter_papers(response(r#"{"data": null}"#), &fragments("Jane Smith"), 20).is_empty());
    }

    #[test]
    fn test_search_url() {
        let scraper = SemanticScholarScraper::new(HttpClient::new().unwrap());
        assert_eq!(
            scraper.search_url("Jane Smith"),
            "https://api.semanticscholar.org/graph/v1/paper/search?query=%22Jane%20Smith%22\
             &fields=title,authors,year,url,citationCount,abstract,externalIds&limit=40"
        );
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let client = HttpClient::new().unwrap();
        let config = SemanticScholarConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            ..SemanticScholarConfig::default()
        };
        let scraper = SemanticScholarScraper::from_config(client.clone(), &config);

        let cached = PaperSearchResult {
            papers: vec![PublicationRecord::new("Cached Paper", PublicationSource::SemanticScholar)],
            profile_url: None,
        };
        scraper.cache().set(&cache_key("Jane Smith"), cached.clone());

        let result = scraper.search_by_name("  JANE SMITH ").await;
        assert_eq!(result, cached);
        assert_eq!(client.request_count(), 0);
    }
}
