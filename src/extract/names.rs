//! Heuristic for telling person names apart from navigation labels.
//!
//! Directory pages mix faculty links with menu items such as "Faculty",
//! "Graduate Students" or "Back". A link text is treated as a name only if it
//! is not a known navigation label and is shaped like "First Last" or
//! "Last, First". Names with lower-case particles and no second capitalized
//! word ("van der Berg") are rejected.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

const MIN_NAME_LEN: usize = 4;
const MAX_NAME_LEN: usize = 80;

static NAV_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)^(all\s+)?(people|faculty|staff|students)$",
        r"(?i)^(associate\s+|assistant\s+|emerit(us|a|i)\s+|visiting\s+)?professors?$",
        r"(?i)^(instructors?|postdocs?|researchers?|graduate\s+students?)$",
        r"(?i)^visitors?\s*(&|\+|and)\s*affiliates?$",
        r"(?i)^(directory|home|contact|about|back|overview|search|news|events|admissions)$",
        r"(?i)^(programs?|courses?|seminars?|resources?)$",
        r"(?i)^department",
        r"(?i)^(administration|leadership)$",
    ])
    .expect("navigation patterns are valid")
});

static LEADING_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zÀ-ÿ]").expect("leading letter pattern is valid"));

static LAST_COMMA_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-zÀ-ÿ'\-]+,\s+[A-Za-zÀ-ÿ]").expect("comma name pattern is valid")
});

static CAPITALIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-ZÀ-Ý]").expect("capitalized word pattern is valid"));

/// Whether the text is a navigation or section label rather than a name
pub fn is_navigation_text(text: &str) -> bool {
    NAV_PATTERNS.is_match(text.trim())
}

/// Whether link text plausibly names a person
pub fn looks_like_person_name(text: &str) -> bool {
    let text = text.trim();
    let len = text.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return false;
    }
    if is_navigation_text(text) {
        return false;
    }
    if !text.contains(' ') && !text.contains(',') {
        return false;
    }
    if !LEADING_LETTER.is_match(text) {
        return false;
    }
    if LAST_COMMA_FIRST.is_match(text) {
        return true;
    }

    text.split_whitespace()
        .filter(|word| CAPITALIZED.is_match(word))
        .count()
        >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_name_shapes() {
        assert!(looks_like_person_name("Jane Smith"));
        assert!(looks_like_person_name("Smith, Jane"));
        assert!(looks_like_person_name("José Álvarez"));
        assert!(looks_like_person_name("Dr. Ada Lovelace"));
        assert!(looks_like_person_name("O'Brien, Pat"));
    }

    #[test]
    fn test_rejects_navigation_labels() {
        for label in [
            "Faculty",
            "All People",
            "Graduate Students",
            "Associate Professors",
            "Emeritus Professors",
            "Visitors & Affiliates",
            "Department of Physics",
            "Back",
            "Leadership",
        ] {
            assert!(!looks_like_person_name(label), "{label} should be rejected");
        }
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert!(!looks_like_person_name("A B"));
        assert!(!looks_like_person_name(&"Abc ".repeat(25)));
    }

    #[test]
    fn test_rejects_single_token_and_leading_digit() {
        assert!(!looks_like_person_name("Smith"));
        assert!(!looks_like_person_name("2024 Colloquium Series"));
        assert!(!looks_like_person_name("(Jane Smith)"));
    }

    #[test]
    fn test_rejects_lowercase_particles_without_second_capital() {
        assert!(!looks_like_person_name("van der Berg"));
        assert!(!looks_like_person_name("read more about us"));
    }

    #[test]
    fn test_navigation_detection_is_case_insensitive() {
        assert!(is_navigation_text("FACULTY"));
        assert!(is_navigation_text("  directory "));
        assert!(!is_navigation_text("Jane Smith"));
    }
}
