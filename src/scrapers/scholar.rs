//! Google Scholar search-page scraping.
//!
//! Scholar has no public API and answers automated traffic with 429s and
//! CAPTCHA interstitials. Every request is preceded by a random pause, 429s are
//! retried with backoff, and a challenge page is recognized and treated as "no
//! results" rather than parsed. Failures never reach the caller: both public
//! operations return an empty [`PaperSearchResult`] instead.

use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

use crate::config::ScholarConfig;
use crate::extract::{element_text, parse_year, resolve_url, select_all, select_first};
use crate::models::{PaperSearchResult, PublicationBuilder, PublicationRecord, PublicationSource};
use crate::utils::{delay_between, with_backoff, HttpClient, Jitter, RandomJitter, RetryConfig};

use super::{PaperSource, ScrapeError};

/// Results requested per search page
const RESULTS_PER_PAGE: u32 = 20;

/// Form and container ids Scholar uses on its challenge page
const CAPTCHA_SELECTORS: &[&str] = &["#gs_captcha_f", "#gs_captcha_c", "#captcha-form", "#recaptcha"];

/// Phrases shown on the challenge page, lower-cased
const CAPTCHA_PHRASES: &[&str] = &[
    "unusual traffic",
    "solving the above captcha",
    "please show you're not a robot",
];

static CITED_BY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Cited by (\d+)").expect("cited-by pattern is valid"));

/// Whether the page is a bot-detection challenge instead of results
pub fn is_captcha_page(html: &str) -> bool {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    if CAPTCHA_SELECTORS.iter().any(|css| select_first(root, css).is_some()) {
        return true;
    }

    let text = element_text(root).to_lowercase();
    CAPTCHA_PHRASES.iter().any(|phrase| text.contains(phrase))
}

/// Scholar search-page scraper
#[derive(Debug, Clone)]
pub struct ScholarScraper {
    client: HttpClient,
    base_url: String,
    retry: RetryConfig,
    request_delay: (Duration, Duration),
    jitter: Arc<dyn Jitter>,
}

impl ScholarScraper {
    /// Create a scraper with the default endpoint and politeness settings
    pub fn new(client: HttpClient) -> Self {
        Self::from_config(client, &ScholarConfig::default())
    }

    pub fn from_config(client: HttpClient, config: &ScholarConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry: config.retry.to_retry_config(),
            request_delay: config.request_delay(),
            jitter: Arc::new(RandomJitter),
        }
    }

    /// Replace the randomness used for pauses and backoff
    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    /// Search URL for an author-restricted query
    pub fn search_url(&self, name: &str) -> String {
        let query = format!("author:\"{}\"", name.trim());
        format!(
            "{}/scholar?q={}&hl=en&num={}",
            self.base_url,
            urlencoding::encode(&query),
            RESULTS_PER_PAGE
        )
    }

    /// Search Scholar for papers by the named author
    pub async fn search_by_name(&self, name: &str) -> PaperSearchResult {
        tracing::info!("Searching Google Scholar for: {}", name);

        let result = match self.try_search(name).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Google Scholar search failed (may be rate-limited): {}", e);
                PaperSearchResult::empty()
            }
        };

        tracing::info!("Found {} papers for {}", result.len(), name);
        result
    }

    /// Fetch an author profile page and list its papers
    pub async fn get_author_profile(&self, profile_url: &str) -> PaperSearchResult {
        tracing::info!("Fetching Scholar profile: {}", profile_url);

        let papers = match self.try_profile(profile_url).await {
            Ok(papers) => papers,
            Err(e) => {
                tracing::warn!("Scholar profile fetch failed: {}", e);
                Vec::new()
            }
        };

        PaperSearchResult {
            papers,
            profile_url: Some(profile_url.to_string()),
        }
    }

    async fn try_search(&self, name: &str) -> Result<PaperSearchResult, ScrapeError> {
        let base = self.base()?;
        let html = self.fetch_page(&self.search_url(name)).await?;
        if is_captcha_page(&html) {
            tracing::warn!("Google Scholar returned a CAPTCHA page for {}", name);
            return Ok(PaperSearchResult::empty());
        }
        Ok(Self::parse_search_results(&html, &base))
    }

    async fn try_profile(&self, profile_url: &str) -> Result<Vec<PublicationRecord>, ScrapeError> {
        let base = self.base()?;
        let html = self.fetch_page(profile_url).await?;
        if is_captcha_page(&html) {
            tracing::warn!("Google Scholar returned a CAPTCHA page for {}", profile_url);
            return Ok(Vec::new());
        }
        Ok(Self::parse_author_profile(&html, &base))
    }

    fn base(&self) -> Result<Url, ScrapeError> {
        Url::parse(&self.base_url).map_err(|e| ScrapeError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })
    }

    /// GET with a random pause before every attempt, retries included
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError> {
        with_backoff(&self.retry, self.jitter.as_ref(), || async move {
            self.pause().await;
            self.client.fetch(url).await
        })
        .await
    }

    async fn pause(&self) {
        let (min, max) = self.request_delay;
        let pause = delay_between(self.jitter.as_ref(), min, max);
        if !pause.is_zero() {
            tracing::debug!("Pausing {:?} before Scholar request", pause);
            tokio::time::sleep(pause).await;
        }
    }

    /// Parse a search-results page
    pub fn parse_search_results(html: &str, base: &Url) -> PaperSearchResult {
        let doc = Html::parse_document(html);
        let root = doc.root_element();

        let papers = select_all(root, ".gs_r.gs_or.gs_scl")
            .into_iter()
            .filter_map(|item| Self::parse_result_item(item, base))
            .collect();

        let profile_url = select_first(root, r#"a[href*="/citations?user="]"#)
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_url(base, href));

        PaperSearchResult { papers, profile_url }
    }

    fn parse_result_item(item: ElementRef<'_>, base: &Url) -> Option<PublicationRecord> {
        let title_link = select_first(item, ".gs_rt a")?;
        let title = element_text(title_link);
        if title.is_empty() {
            return None;
        }

        let byline = select_first(item, ".gs_a").map(element_text).unwrap_or_default();
        let authors = byline.split(" - ").next().unwrap_or_default().trim().to_string();

        let cited_by = select_all(item, ".gs_fl a")
            .into_iter()
            .map(element_text)
            .find_map(|text| CITED_BY_RE.captures(&text).and_then(|c| c[1].parse().ok()));

        let record = PublicationBuilder::new(title, PublicationSource::GoogleScholar)
            .authors(authors)
            .year(parse_year(&byline))
            .url(title_link.value().attr("href").and_then(|href| resolve_url(base, href)))
            .cited_by(cited_by)
            .abstract_text(select_first(item, ".gs_rs").map(element_text).unwrap_or_default())
            .build();

        Some(record)
    }

    /// Parse the cited-by table of an author profile page
    pub fn parse_author_profile(html: &str, base: &Url) -> Vec<PublicationRecord> {
        let doc = Html::parse_document(html);

        select_all(doc.root_element(), "#gsc_a_b .gsc_a_tr")
            .into_iter()
            .filter_map(|row| {
                let title_el = select_first(row, ".gsc_a_at")?;
                let title = element_text(title_el);
                if title.is_empty() {
                    return None;
                }

                let authors = select_first(row, ".gs_gray").map(element_text).unwrap_or_default();
                let year = select_first(row, ".gsc_a_y span")
                    .and_then(|el| element_text(el).parse::<u16>().ok())
                    .filter(|y| *y > 0);
                let cited_by = select_first(row, ".gsc_a_ac")
                    .and_then(|el| element_text(el).parse::<u32>().ok())
                    .filter(|n| *n > 0);
                let url = title_el
                    .value()
                    .attr("href")
                    .or_else(|| title_el.value().attr("data-href"))
                    .and_then(|href| resolve_url(base, href));

                Some(
                    PublicationBuilder::new(title, PublicationSource::GoogleScholar)
                        .authors(authors)
                        .year(year)
                        .url(url)
                        .cited_by(cited_by)
                        .build(),
                )
            })
            .collect()
    }
}

#[async_trait]
impl PaperSource for ScholarScraper {
    fn source(&self) -> PublicationSource {
        PublicationSource::GoogleScholar
    }

    async fn search_by_name(&self, name: &str) -> Result<PaperSearchResult, ScrapeError> {
        Ok(ScholarScraper::search_by_name(self, name).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"<html><body>
      <div class="gs_r gs_or gs_scl">
        <h3 class="gs_rt"><a href="https://dl.example.org/raft">In Search of an Understandable Consensus Algorithm</a></h3>
        <div class="gs_a">J Smith, K Lee - USENIX ATC, 2014 - usenix.org</div>
        <div class="gs_rs">Raft is a consensus algorithm for managing a replicated log.</div>
        <div class="gs_fl"><a href="/scholar?cites=1">Cited by 4821</a><a href="/scholar?related">Related articles</a></div>
      </div>
      <div class="gs_r gs_or gs_scl">
        <h3 class="gs_rt"><a href="/scholar_url?id=2">Paxos Made Practical</a></h3>
        <div class="gs_a">J Smith - Technical report</div>
      </div>
      <div class="gs_r gs_or gs_scl"><h3 class="gs_rt">[CITATION] No link here</h3></div>
      <a href="/citations?user=abc123&hl=en">Jane Smith</a>
    </body></html>"#;

    fn base() -> Url {
        Url::parse("https://scholar.google.com").unwrap()
    }

    #[test]
    fn test_parse_search_results() {
        let result = ScholarScraper::parse_search_results(RESULTS, &base());
        assert_eq!(result.len(), 2);

        let raft = &result.papers[0];
        assert_eq!(raft.title, "In Search of an Understandable Consensus Algorithm");
        assert_eq!(raft.authors.as_deref(), Some("J Smith, K Lee"));
        assert_eq!(raft.year, Some(2014));
        assert_eq!(raft.cited_by, Some(4821));
        assert_eq!(raft.url.as_deref(), Some("https://dl.example.org/raft"));
        assert!(raft.abstract_text.as_deref().unwrap().starts_with("Raft is"));
        assert_eq!(raft.source, PublicationSource::GoogleScholar);

        let paxos = &result.papers[1];
        assert_eq!(paxos.year, None);
        assert_eq!(paxos.cited_by, None);
        assert_eq!(paxos.abstract_text, None);
        assert_eq!(paxos.url.as_deref(), Some("https://scholar.google.com/scholar_url?id=2"));

        assert_eq!(
            result.profile_url.as_deref(),
            Some("https://scholar.google.com/citations?user=abc123&hl=en")
        );
    }

    #[test]
    fn test_parse_author_profile() {
        let html = r#"<html><body><table><tbody id="gsc_a_b">
          <tr class="gsc_a_tr">
            <td><a class="gsc_a_at" href="/citations?view_op=view_citation&citation_for_view=abc:1">Raft Revisited</a>
                <div class="gs_gray">J Smith, K Lee</div><div class="gs_gray">OSDI</div></td>
            <td class="gsc_a_c"><a class="gsc_a_ac">120</a></td>
            <td class="gsc_a_y"><span>2020</span></td>
          </tr>
          <tr class="gsc_a_tr">
            <td><a class="gsc_a_at">Unpublished Notes</a><div class="gs_gray">J Smith</div></td>
            <td class="gsc_a_c"><a class="gsc_a_ac"></a></td>
            <td class="gsc_a_y"><span></span></td>
          </tr>
        </tbody></table></body></html>"#;

        let papers = ScholarScraper::parse_author_profile(html, &base());
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[0].authors.as_deref(), Some("J Smith, K Lee"));
        assert_eq!(papers[0].year, Some(2020));
        assert_eq!(papers[0].cited_by, Some(120));
        assert!(papers[0].url.as_deref().unwrap().starts_with("https://scholar.google.com/citations"));
        assert_eq!(papers[1].year, None);
        assert_eq!(papers[1].cited_by, None);
        assert_eq!(papers[1].url, None);
    }

    #[test]
    fn test_captcha_detection() {
        assert!(is_captcha_page(r#"<html><body><form id="gs_captcha_f"></form></body></html>"#));
        assert!(is_captcha_page(
            "<html><body><p>Our systems have detected unusual traffic from your computer network.</p></body></html>"
        ));
        assert!(!is_captcha_page(RESULTS));
    }

    #[test]
    fn test_search_url_quotes_author() {
        let client = HttpClient::new().unwrap();
        let scraper = ScholarScraper::new(client);
        assert_eq!(
            scraper.search_url("Jane Smith"),
            "https://scholar.google.com/scholar?q=author%3A%22Jane%20Smith%22&hl=en&num=20"
        );
    }

    #[test]
    fn test_empty_page_parses_to_nothing() {
        let result = ScholarScraper::parse_search_results("<html><body></body></html>", &base());
        assert!(result.is_empty());
        assert!(result.profile_url.is_none());
    }
}
