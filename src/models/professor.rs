//! Faculty listing candidates and profile records.

use serde::{Deserialize, Serialize};

use super::PublicationRecord;

/// A person link found on a faculty-directory page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorLinkCandidate {
    pub name: String,

    /// Absolute profile URL, empty when the listing item has no link
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProfessorLinkCandidate {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            title: None,
            department: None,
            image_url: None,
        }
    }
}

/// Result of scraping a faculty-directory page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResult {
    pub professor_links: Vec<ProfessorLinkCandidate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
}

/// A student, postdoc or staff member listed on a lab page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabMemberCandidate {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Best-effort structured view of a single faculty profile page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Bio or research description, at most 2000 characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_summary: Option<String>,

    pub research_areas: Vec<String>,

    pub publications: Vec<PublicationRecord>,

    pub lab_members: Vec<LabMemberCandidate>,

    /// Always the URL that was scraped
    pub website_url: String,
}

impl ProfessorProfile {
    pub fn new(website_url: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            ..Self::default()
        }
    }
}
