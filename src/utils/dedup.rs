//! Best-effort name-based deduplication for callers that persist results.
//!
//! Nothing the scrapers return carries a stable identifier, so the only identity
//! available is the person's name compared case-insensitively after trimming.

use std::collections::HashSet;

use crate::models::ProfessorLinkCandidate;

/// Comparison form of a personal name
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether `name` matches any of the already-known names
pub fn is_known_name<'a>(known: impl IntoIterator<Item = &'a str>, name: &str) -> bool {
    let target = normalize_name(name);
    known.into_iter().any(|k| normalize_name(k) == target)
}

/// Drop candidates whose name repeats an earlier one, keeping the first
pub fn dedup_candidates_by_name(candidates: Vec<ProfessorLinkCandidate>) -> Vec<ProfessorLinkCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(normalize_name(&c.name)))
        .collect()
}

/// Indices of candidates that repeat an earlier name
pub fn find_name_duplicates(candidates: &[ProfessorLinkCandidate]) -> Vec<usize> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| !seen.insert(normalize_name(&c.name)))
        .map(|(i, _)| i)
        .collect()
}
