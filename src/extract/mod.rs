//! Pure, network-free extraction helpers.
//!
//! Pages scraped here have no schema. Every field is located by an ordered list
//! of structural guesses, most specific first, and the first guess that yields
//! plausible content wins. [`first_match`] and [`first_nonempty_group`] encode
//! that policy once so the scrapers only declare their selector lists.

pub mod email;
pub mod names;
pub mod text;

pub use email::{collect_email_candidates, score_email, select_email};
pub use names::{is_navigation_text, looks_like_person_name};
pub use text::{clean_text, element_text, page_origin, parse_year, resolve_url, truncate_chars, visible_text};

use scraper::{ElementRef, Selector};

/// A field extractor: inspects the page and maybe produces a value
pub type Extractor<'a, T> = &'a dyn Fn(ElementRef<'_>) -> Option<T>;

/// Parse a CSS selector; a bad selector is logged and skipped
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(sel) => Some(sel),
        Err(e) => {
            tracing::warn!("Invalid selector {:?}: {}", css, e);
            None
        }
    }
}

/// First element under `root` matching `css`
pub fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let sel = selector(css)?;
    root.select(&sel).next()
}

/// All elements under `root` matching `css`
pub fn select_all<'a>(root: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(sel) => root.select(&sel).collect(),
        None => Vec::new(),
    }
}

/// Run extractors in order and return the first value produced
pub fn first_some<T>(root: ElementRef<'_>, extractors: &[Extractor<'_, T>]) -> Option<T> {
    extractors.iter().find_map(|extract| extract(root))
}

/// For each selector in order, apply `extract` to its first matching element;
/// return the first value produced
pub fn first_match<'a, T>(
    root: ElementRef<'a>,
    selectors: &[&str],
    mut extract: impl FnMut(ElementRef<'a>) -> Option<T>,
) -> Option<T> {
    selectors
        .iter()
        .filter_map(|css| select_first(root, css))
        .find_map(|el| extract(el))
}

/// Text of the first element of the first selector whose text passes `accept`
pub fn first_text(root: ElementRef<'_>, selectors: &[&str], accept: impl Fn(&str) -> bool) -> Option<String> {
    first_match(root, selectors, |el| {
        let text = element_text(el);
        (!text.is_empty() && accept(&text)).then_some(text)
    })
}

/// For each selector group in order, map `extract` over its matches (at most
/// `limit` elements scanned); return the first group yielding any items
pub fn first_nonempty_group<'a, T>(
    root: ElementRef<'a>,
    selectors: &[&str],
    limit: Option<usize>,
    mut extract: impl FnMut(ElementRef<'a>) -> Option<T>,
) -> Vec<T> {
    for css in selectors {
        let Some(sel) = selector(css) else {
            continue;
        };
        let items: Vec<T> = root
            .select(&sel)
            .take(limit.unwrap_or(usize::MAX))
            .filter_map(&mut extract)
            .collect();
        if !items.is_empty() {
            tracing::debug!("Selector group {:?} yielded {} items", css, items.len());
            return items;
        }
    }
    Vec::new()
}
