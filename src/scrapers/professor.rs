//! Faculty profile page scraping.
//!
//! Every field is found by walking a priority-ordered selector list and taking
//! the first guess whose content looks plausible (length- or pattern-bounded).
//! Nothing here fails on missing markup; absent fields stay `None` or empty.

use scraper::{ElementRef, Html};
use url::Url;

use crate::extract::{
    clean_text, collect_email_candidates, element_text, first_match, first_nonempty_group, first_some,
    first_text, page_origin, parse_year, resolve_url, select_all, select_email, select_first,
    truncate_chars, Extractor,
};
use crate::models::{LabMemberCandidate, ProfessorProfile, PublicationBuilder, PublicationRecord, PublicationSource};
use crate::utils::HttpClient;

use super::ScrapeError;

const NAME_SELECTORS: &[&str] = &["h1.professor-name", "h1.page-title", "h1.entry-title", "h1"];

const TITLE_SELECTORS: &[&str] = &[
    ".title",
    ".position",
    ".job-title",
    ".rank",
    ".field-field-title",
    ".professor-title",
];

const DEPARTMENT_SELECTORS: &[&str] = &[".department", ".dept", ".affiliation", ".field-department"];

const PHONE_SELECTORS: &[&str] = &[".phone", ".telephone", ".tel", ".field-phone"];

const OFFICE_SELECTORS: &[&str] = &[".office", ".location", ".room", ".field-office"];

const IMAGE_SELECTORS: &[&str] = &[
    ".profile-image img",
    ".faculty-photo img",
    ".portrait img",
    ".headshot img",
    ".photo img",
    "img.professor",
    "img.profile-pic",
    ".content img",
];

const BIO_SELECTORS: &[&str] = &[
    ".biography",
    ".bio",
    ".research-interests",
    ".research-description",
    ".about",
    ".profile-body",
    "#research",
    "#biography",
    ".field-body",
];

const CONTENT_SELECTORS: &[&str] = &["main", ".content", ".main-content", "article", "#content"];

const AREA_SELECTORS: &[&str] = &[
    ".research-areas li",
    ".interests li",
    ".research-topics li",
    ".keywords li",
    ".tags a",
];

const PUBLICATION_SELECTORS: &[&str] = &[
    ".publications li",
    ".pub-list li",
    ".bibliography li",
    "#publications li",
    ".publication-item",
];

const LAB_SELECTORS: &[&str] = &[
    ".lab-members li",
    ".people-list li",
    ".team-member",
    ".group-member",
    "#people li",
    "#lab-members li",
];

/// Short labels (title, department, office, research area) must stay under this
const MAX_LABEL_LEN: usize = 100;
const MIN_BIO_LEN: usize = 50;
const MIN_CONTENT_LEN: usize = 100;
const MAX_SUMMARY_LEN: usize = 2000;
const MAX_PUBLICATIONS_SCANNED: usize = 20;
const MAX_PUBLICATION_TITLE_LEN: usize = 200;

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn is_label(text: &str) -> bool {
    char_len(text) < MAX_LABEL_LEN
}

/// Scrapes an individual faculty profile page
#[derive(Debug, Clone)]
pub struct ProfessorScraper {
    client: HttpClient,
}

impl ProfessorScraper {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch a profile page and extract a best-effort profile
    pub async fn scrape(&self, url: &str) -> Result<ProfessorProfile, ScrapeError> {
        tracing::info!("Scraping professor profile: {}", url);
        let base = page_origin(url)?;
        let html = self.client.fetch(url).await?;

        let profile = Self::parse(&html, url, &base);
        tracing::info!(
            "Scraped professor profile: {} ({} publications, {} lab members)",
            profile.name.as_deref().unwrap_or("unknown"),
            profile.publications.len(),
            profile.lab_members.len()
        );
        Ok(profile)
    }

    /// Extract a profile from markup; `base` is the page origin
    pub fn parse(html: &str, page_url: &str, base: &Url) -> ProfessorProfile {
        let doc = Html::parse_document(html);
        let root = doc.root_element();

        let mut profile = ProfessorProfile::new(page_url);

        let heading: Extractor<'_, String> = &|root| first_text(root, NAME_SELECTORS, |_| true);
        let og_title: Extractor<'_, String> = &|root| {
            select_first(root, r#"meta[property="og:title"]"#)
                .and_then(|meta| meta.value().attr("content"))
                .map(clean_text)
                .filter(|t| !t.is_empty())
        };
        profile.name = first_some(root, &[heading, og_title]);

        profile.title = first_text(root, TITLE_SELECTORS, is_label);
        profile.department = first_text(root, DEPARTMENT_SELECTORS, is_label);
        profile.email = select_email(&collect_email_candidates(&doc), profile.name.as_deref());
        profile.phone = Self::phone(root);
        profile.office = first_text(root, OFFICE_SELECTORS, is_label);

        profile.image_url = first_match(root, IMAGE_SELECTORS, |img| {
            img.value().attr("src").and_then(|src| resolve_url(base, src))
        });

        profile.research_summary = Self::research_summary(root);

        profile.research_areas = first_nonempty_group(root, AREA_SELECTORS, None, |el| {
            let text = element_text(el);
            (!text.is_empty() && is_label(&text)).then_some(text)
        });

        profile.publications = first_nonempty_group(root, PUBLICATION_SELECTORS, Some(MAX_PUBLICATIONS_SCANNED), |el| {
            Self::parse_publication(el, base)
        });

        profile.lab_members = first_nonempty_group(root, LAB_SELECTORS, None, |el| Self::parse_lab_member(el, base));

        profile
    }

    fn phone(root: ElementRef<'_>) -> Option<String> {
        let tel_link = select_all(root, "a[href]").into_iter().find_map(|a| {
            let href = a.value().attr("href")?.trim();
            let number = href.strip_prefix("tel:")?;
            let number = urlencoding::decode(number).map(|n| n.into_owned()).unwrap_or_else(|_| number.to_string());
            let number = clean_text(&number);
            (!number.is_empty()).then_some(number)
        });

        tel_link.or_else(|| first_text(root, PHONE_SELECTORS, is_label))
    }

    fn research_summary(root: ElementRef<'_>) -> Option<String> {
        if let Some(bio) = first_text(root, BIO_SELECTORS, |t| char_len(t) > MIN_BIO_LEN) {
            return Some(truncate_chars(&bio, MAX_SUMMARY_LEN));
        }

        let largest = CONTENT_SELECTORS
            .iter()
            .flat_map(|css| select_all(root, css))
            .map(element_text)
            .max_by_key(|text| char_len(text))?;

        if char_len(&largest) >= MIN_CONTENT_LEN {
            tracing::debug!("Using main content as research summary");
            Some(truncate_chars(&largest, MAX_SUMMARY_LEN))
        } else {
            None
        }
    }

    fn parse_publication(item: ElementRef<'_>, base: &Url) -> Option<PublicationRecord> {
        let full_text = element_text(item);
        let title = select_first(item, "a, .title, strong, em")
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| full_text.clone());

        let len = char_len(&title);
        if len <= 10 || len >= 300 {
            return None;
        }

        let url = select_first(item, "a")
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_url(base, href));

        let mut builder = PublicationBuilder::new(truncate_chars(&title, MAX_PUBLICATION_TITLE_LEN), PublicationSource::FacultyPage)
            .year(parse_year(&full_text))
            .url(url);
        if let Some(authors) = first_text(item, &[".authors", ".author", ".pub-authors"], |_| true) {
            builder = builder.authors(authors);
        }

        Some(builder.build())
    }

    fn parse_lab_member(item: ElementRef<'_>, base: &Url) -> Option<LabMemberCandidate> {
        let name = select_first(item, "a, .name, strong")
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| element_text(item));

        let len = char_len(&name);
        if len <= 2 || len >= 80 {
            return None;
        }

        let links = select_all(item, "a[href]");
        let email = links.iter().find_map(|a| {
            let href = a.value().attr("href")?.trim();
            href.strip_prefix("mailto:")
                .map(|target| target.split('?').next().unwrap_or_default().trim().to_lowercase())
                .filter(|e| !e.is_empty())
        });
        let url = links
            .iter()
            .filter_map(|a| a.value().attr("href"))
            .find(|href| !href.trim_start().starts_with("mailto:"))
            .and_then(|href| resolve_url(base, href));

        Some(LabMemberCandidate {
            name,
            role: first_text(item, &[".role", ".position", ".title"], |_| true),
            email,
            url,
        })
    }
}
