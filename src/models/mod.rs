//! Result values returned by the scrapers.
//!
//! None of these carry a persistent identifier; callers that store them are
//! responsible for deduplicating by name.

mod professor;
mod publication;

pub use professor::{DepartmentResult, LabMemberCandidate, ProfessorLinkCandidate, ProfessorProfile};
pub use publication::{PaperSearchResult, PublicationBuilder, PublicationRecord, PublicationSource};
