//! # Faculty Scout
//!
//! Discovers academic staff and their publications from faculty directory pages,
//! individual profile pages, a scraped Scholar search page and the Semantic
//! Scholar API.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Result records (professor candidates, profiles, publications)
//! - [`extract`]: Pure HTML extraction helpers and heuristics
//! - [`scrapers`]: Department, professor, Scholar and Semantic Scholar scrapers plus the discovery fallback
//! - [`utils`]: HTTP fetch primitive, retry with backoff, TTL cache, deduplication
//! - [`config`]: Configuration management

pub mod config;
pub mod extract;
pub mod models;
pub mod scrapers;
pub mod utils;

// Re-export commonly used types
pub use models::{DepartmentResult, PaperSearchResult, ProfessorProfile, PublicationRecord};
pub use scrapers::{
    DepartmentScraper, PaperSource, ProfessorScraper, PublicationDiscovery, ScholarScraper, ScrapeError,
    SemanticScholarScraper,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
