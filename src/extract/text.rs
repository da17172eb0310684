//! Text and URL normalization.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Node};
use url::Url;

use crate::scrapers::ScrapeError;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19|20)\d{2}\b").expect("year pattern is valid"));

/// Collapse runs of whitespace and trim
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned text content of an element
pub fn element_text(el: ElementRef<'_>) -> String {
    clean_text(&el.text().collect::<String>())
}

/// Text content of an element, skipping script, style and noscript subtrees
pub fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"))
            });
            if !hidden {
                out.push_str(text);
                out.push(' ');
            }
        }
    }
    clean_text(&out)
}

/// Truncate to at most `max` characters
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// First four-digit year in 1900-2099 appearing as a whole word
pub fn parse_year(text: &str) -> Option<u16> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Origin (scheme, host, port) of a page URL, used as the base for relative links
pub fn page_origin(page_url: &str) -> Result<Url, ScrapeError> {
    let url = Url::parse(page_url).map_err(|e| ScrapeError::InvalidUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;

    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(ScrapeError::InvalidUrl {
            url: page_url.to_string(),
            reason: "URL has no host".to_string(),
        });
    }

    Url::parse(&origin.ascii_serialization()).map_err(|e| ScrapeError::InvalidUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve `href` against `base`; absolute hrefs pass through unchanged
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(String::from)
}
