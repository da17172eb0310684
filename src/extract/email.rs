//! Contact email discovery on profile pages.
//!
//! Profile pages usually list several addresses: the person's own plus the
//! department office, webmaster and so on. Candidates are gathered from
//! `mailto:` links and from the visible text, then scored; only a candidate
//! with a positive score is chosen.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::{select_all, visible_text};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}")
        .expect("email pattern is valid")
});

static ACADEMIC_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\.)(?:edu|ac\.[a-z]{2,}|edu\.[a-z]{2,})$").expect("academic domain pattern is valid")
});

/// Local-part prefixes of shared or role mailboxes
const GENERIC_PREFIXES: &[&str] = &[
    "info",
    "admin",
    "office",
    "webmaster",
    "contact",
    "dept",
    "department",
    "general",
    "enquiries",
    "inquiries",
    "reception",
    "secretary",
    "noreply",
    "no-reply",
    "postmaster",
    "grad",
    "undergrad",
    "advising",
];

const ADMIN_KEYWORDS: &[&str] = &["help", "support"];

const PLACEHOLDER_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "test.com", "domain.com"];

const MAILTO: &str = "mailto:";

const GENERIC_PENALTY: i32 = 50;
const ACADEMIC_BONUS: i32 = 5;
const NAME_FRAGMENT_BONUS: i32 = 10;
const PLACEHOLDER_PENALTY: i32 = 100;
const MIN_FRAGMENT_LEN: usize = 3;

/// Lower-cased, de-duplicated addresses from `mailto:` links, then page text
pub fn collect_email_candidates(doc: &Html) -> Vec<String> {
    let root = doc.root_element();
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |email: &str| {
        let email = email.trim().to_lowercase();
        if !email.is_empty() && !candidates.contains(&email) {
            candidates.push(email);
        }
    };

    for link in select_all(root, "a[href]") {
        let Some(href) = link.value().attr("href").map(str::trim) else {
            continue;
        };
        if !href.get(..MAILTO.len()).is_some_and(|s| s.eq_ignore_ascii_case(MAILTO)) {
            continue;
        }
        let target = href[MAILTO.len()..].split('?').next().unwrap_or_default();
        let decoded = urlencoding::decode(target).map(|d| d.into_owned()).unwrap_or_else(|_| target.to_string());
        if let Some(m) = EMAIL_RE.find(&decoded) {
            push(m.as_str());
        }
    }

    let body = select_all(root, "body").into_iter().next().unwrap_or(root);
    for m in EMAIL_RE.find_iter(&visible_text(body)) {
        push(m.as_str());
    }

    candidates
}

fn name_fragments(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphabetic())
        .filter(|f| f.chars().count() >= MIN_FRAGMENT_LEN)
        .map(String::from)
        .collect()
}

fn domain_matches(domain: &str, candidate: &str) -> bool {
    domain == candidate || domain.ends_with(&format!(".{candidate}"))
}

/// Score an address as the profile owner's contact; positive means plausible
pub fn score_email(email: &str, name: Option<&str>) -> i32 {
    let email = email.to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return -PLACEHOLDER_PENALTY;
    };

    let mut score = 0;

    let generic = GENERIC_PREFIXES.iter().any(|p| local.starts_with(p))
        || ADMIN_KEYWORDS.iter().any(|k| local.contains(k));
    if generic {
        score -= GENERIC_PENALTY;
    }

    if ACADEMIC_DOMAIN_RE.is_match(domain) {
        score += ACADEMIC_BONUS;
    }

    if let Some(name) = name {
        let matched = name_fragments(name)
            .iter()
            .filter(|f| local.contains(f.as_str()))
            .count() as i32;
        score += matched * NAME_FRAGMENT_BONUS;
    }

    if PLACEHOLDER_DOMAINS.iter().any(|d| domain_matches(domain, d)) {
        score -= PLACEHOLDER_PENALTY;
    }

    score
}

/// Highest-scoring candidate with a positive score; ties keep page order
pub fn select_email(candidates: &[String], name: Option<&str>) -> Option<String> {
    let mut best: Option<(&String, i32)> = None;
    for candidate in candidates {
        let score = score_email(candidate, name);
        tracing::trace!("Email candidate {} scored {}", candidate, score);
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate, score));
        }
    }
    best.map(|(email, _)| email.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_mailto_and_text_addresses() {
        let doc = Html::parse_document(
            r#"<html><body>
                <a href="mailto:JSmith@CS.Example.EDU?subject=Hi">Email</a>
                <p>Office: webmaster@cs.example.edu or jsmith@cs.example.edu.</p>
                <script>var spam = "bot@tracker.io";</script>
            </body></html>"#,
        );

        let candidates = collect_email_candidates(&doc);
        assert_eq!(candidates, vec!["jsmith@cs.example.edu", "webmaster@cs.example.edu"]);
    }

    #[test]
    fn test_personal_address_beats_webmaster() {
        let candidates = vec!["webmaster@cs.example.edu".to_string(), "jsmith@cs.example.edu".to_string()];
        assert_eq!(
            select_email(&candidates, Some("Jane Smith")).as_deref(),
            Some("jsmith@cs.example.edu")
        );
    }

    #[test]
    fn test_only_generic_addresses_yield_none() {
        let candidates = vec!["info@cs.example.edu".to_string(), "help-desk@cs.example.edu".to_string()];
        assert_eq!(select_email(&candidates, Some("Jane Smith")), None);
        assert_eq!(select_email(&["info@example.com".to_string()], Some("Jane Smith")), None);
    }

    #[test]
    fn test_placeholder_domain_never_wins() {
        let candidates = vec!["jane.smith@example.com".to_string()];
        assert!(score_email(&candidates[0], Some("Jane Smith")) < 0);
        assert_eq!(select_email(&candidates, Some("Jane Smith")), None);
    }

    #[test]
    fn test_academic_domain_alone_is_enough() {
        assert_eq!(score_email("lab-pi@physics.ox.ac.uk", None), ACADEMIC_BONUS);
        assert_eq!(score_email("someone@gmail.com", None), 0);
        assert_eq!(
            select_email(&["lab-pi@physics.ox.ac.uk".to_string()], None).as_deref(),
            Some("lab-pi@physics.ox.ac.uk")
        );
    }

    #[test]
    fn test_ties_keep_page_order() {
        let candidates = vec!["a.smith@uni.edu".to_string(), "b.smith@uni.edu".to_string()];
        assert_eq!(select_email(&candidates, Some("Smith")).as_deref(), Some("a.smith@uni.edu"));
    }
}
