//! Faculty directory scraping.

use scraper::{ElementRef, Html};
use url::Url;

use crate::extract::{
    element_text, first_text, looks_like_person_name, page_origin, resolve_url, select_all, select_first,
};
use crate::models::{DepartmentResult, ProfessorLinkCandidate};
use crate::utils::HttpClient;

use super::ScrapeError;

/// Listing layouts seen on directory pages, most specific first
const LISTING_SELECTORS: &[&str] = &[
    ".faculty-member",
    ".faculty-listing .faculty",
    ".people-listing .person",
    ".directory-listing .listing-item",
    ".views-row",
    ".faculty-card",
    ".profile-card",
    ".staff-member",
    ".person-card",
    "table.faculty tbody tr",
    ".faculty-list li",
    ".people-list li",
    ".field-content",
    ".content-area .item",
];

/// A listing group needs this many elements before it is trusted
const MIN_LISTING_ITEMS: usize = 3;

const ITEM_NAME_SELECTOR: &str = "h2, h3, h4, .name, .title";
const ITEM_TITLE_SELECTORS: &[&str] = &[".position", ".job-title", ".rank", ".field-title"];
const ITEM_DEPARTMENT_SELECTORS: &[&str] = &[".department", ".dept", ".affiliation"];

/// Path segments that mark a link as a personal profile
const PROFILE_PATH_SEGMENTS: &[&str] = &["/people/", "/faculty/", "/profile/", "/directory/", "/staff/"];

/// Scrapes faculty directory pages into professor link candidates
#[derive(Debug, Clone)]
pub struct DepartmentScraper {
    client: HttpClient,
}

impl DepartmentScraper {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch a directory page and extract its professor links
    pub async fn scrape(&self, url: &str) -> Result<DepartmentResult, ScrapeError> {
        tracing::info!("Scraping department page: {}", url);
        let base = page_origin(url)?;
        let html = self.client.fetch(url).await?;

        let result = Self::parse(&html, &base);
        tracing::info!("Found {} professor links", result.professor_links.len());
        Ok(result)
    }

    /// Extract professor links from directory markup; `base` is the page origin
    pub fn parse(html: &str, base: &Url) -> DepartmentResult {
        let doc = Html::parse_document(html);
        let root = doc.root_element();

        let department_name = first_text(root, &["h1", "title"], |_| true);

        let professor_links = match Self::listing_group(root) {
            Some((css, items)) => {
                tracing::debug!("Using listing selector {:?} ({} items)", css, items.len());
                items.into_iter().filter_map(|item| Self::parse_item(item, base)).collect()
            }
            None => {
                tracing::debug!("No listing layout matched, scanning profile links");
                Self::profile_links(root, base)
            }
        };

        DepartmentResult {
            professor_links,
            department_name,
        }
    }

    /// First listing layout with enough elements to look like a directory
    fn listing_group<'a>(root: ElementRef<'a>) -> Option<(&'static str, Vec<ElementRef<'a>>)> {
        LISTING_SELECTORS.iter().find_map(|css| {
            let items = select_all(root, css);
            (items.len() >= MIN_LISTING_ITEMS).then_some((*css, items))
        })
    }

    fn parse_item(item: ElementRef<'_>, base: &Url) -> Option<ProfessorLinkCandidate> {
        let link = select_first(item, "a");
        let name = link
            .map(element_text)
            .filter(|t| !t.is_empty())
            .or_else(|| select_first(item, ITEM_NAME_SELECTOR).map(element_text))?;

        if !looks_like_person_name(&name) {
            return None;
        }

        // Listings without a profile link still name a person
        let url = link
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_url(base, href))
            .unwrap_or_default();

        let mut candidate = ProfessorLinkCandidate::new(name, url);
        candidate.title = first_text(item, ITEM_TITLE_SELECTORS, |_| true);
        candidate.department = first_text(item, ITEM_DEPARTMENT_SELECTORS, |_| true);
        candidate.image_url = select_first(item, "img")
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| resolve_url(base, src));

        Some(candidate)
    }

    /// Fallback pass over every link whose path looks like a personal profile
    fn profile_links(root: ElementRef<'_>, base: &Url) -> Vec<ProfessorLinkCandidate> {
        let mut links: Vec<ProfessorLinkCandidate> = Vec::new();

        for a in select_all(root, "a[href]") {
            let Some(href) = a.value().attr("href") else {
                continue;
            };
            if !PROFILE_PATH_SEGMENTS.iter().any(|seg| href.contains(seg)) {
                continue;
            }

            let text = element_text(a);
            if !looks_like_person_name(&text) {
                continue;
            }

            let Some(url) = resolve_url(base, href) else {
                continue;
            };
            if links.iter().any(|c| c.url == url) {
                continue;
            }
            links.push(ProfessorLinkCandidate::new(text, url));
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        page_origin("https://cs.example.edu/people/faculty").unwrap()
    }

    fn card(name: &str, href: &str) -> String {
        format!(
            r#"<div class="faculty-card">
                 <img src="/img/photo.jpg">
                 <a href="{href}">{name}</a>
                 <span class="position">Professor</span>
                 <span class="department">Computer Science</span>
               </div>"#
        )
    }

    #[test]
    fn test_card_grid_filters_navigation() {
        let html = format!(
            "<html><head><title>People | CS</title></head><body><h1>Computer Science</h1>{}{}{}{}{}</body></html>",
            card("Jane Smith", "/people/jane"),
            card("Smith, Bob", "/people/bob"),
            card("Faculty", "/people"),
            card("Ada Lovelace", "https://other.example.org/ada"),
            card("Grace Hopper", "/people/grace"),
        );

        let result = DepartmentScraper::parse(&html, &base());
        assert_eq!(result.department_name.as_deref(), Some("Computer Science"));

        let names: Vec<_> = result.professor_links.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Smith", "Smith, Bob", "Ada Lovelace", "Grace Hopper"]);

        let jane = &result.professor_links[0];
        assert_eq!(jane.url, "https://cs.example.edu/people/jane");
        assert_eq!(jane.title.as_deref(), Some("Professor"));
        assert_eq!(jane.department.as_deref(), Some("Computer Science"));
        assert_eq!(jane.image_url.as_deref(), Some("https://cs.example.edu/img/photo.jpg"));
        assert_eq!(result.professor_links[2].url, "https://other.example.org/ada");

        assert!(result.professor_links.iter().all(|c| c.url.starts_with("http")));
    }

    #[test]
    fn test_first_qualifying_group_wins() {
        let html = r#"<html><body>
            <div class="faculty-member"><a href="/p/a">Alice Adams</a></div>
            <div class="faculty-member"><a href="/p/b">Bert Brown</a></div>
            <div class="faculty-member"><a href="/p/c">Cara Chen</a></div>
            <ul class="people-list">
              <li><a href="/p/d">Dan Dixon</a></li><li><a href="/p/e">Eve Evans</a></li><li><a href="/p/f">Fay Fox</a></li>
            </ul>
        </body></html>"#;

        let result = DepartmentScraper::parse(html, &base());
        assert_eq!(result.professor_links.len(), 3);
        assert_eq!(result.professor_links[0].name, "Alice Adams");
    }

    #[test]
    fn test_heading_name_when_link_text_empty() {
        let html = r#"<html><body>
            <div class="person-card"><a href="/people/a"><img src="a.jpg"></a><h3>Alice Adams</h3></div>
            <div class="person-card"><a href="/people/b"><img src="b.jpg"></a><h3>Bert Brown</h3></div>
            <div class="person-card"><a href="/people/c"><img src="c.jpg"></a><h3>Cara Chen</h3></div>
        </body></html>"#;

        let result = DepartmentScraper::parse(html, &base());
        let names: Vec<_> = result.professor_links.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Adams", "Bert Brown", "Cara Chen"]);
        assert_eq!(result.professor_links[1].url, "https://cs.example.edu/people/b");
    }

    #[test]
    fn test_linkless_items_keep_empty_url() {
        let html = r#"<html><body>
            <div class="faculty-card"><h3>Alice Adams</h3><span class="position">Lecturer</span></div>
            <div class="faculty-card"><a name="bert"></a><h3>Bert Brown</h3></div>
            <div class="faculty-card"><h3>Cara Chen</h3></div>
        </body></html>"#;

        let result = DepartmentScraper::parse(html, &base());
        let names: Vec<_> = result.professor_links.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Adams", "Bert Brown", "Cara Chen"]);
        assert!(result.professor_links.iter().all(|c| c.url.is_empty()));
        assert_eq!(result.professor_links[0].title.as_deref(), Some("Lecturer"));
    }

    #[test]
    fn test_fallback_scans_profile_links() {
        let html = r#"<html><head><title>Our People</title></head><body>
            <nav><a href="/people/">People</a><a href="/faculty/">Faculty</a></nav>
            <a href="/people/jane-smith">Jane Smith</a>
            <a href="/people/jane-smith">Jane Smith</a>
            <a href="https://cs.example.edu/faculty/bob">Bob Jones</a>
            <a href="/news/launch">Launch Party Recap</a>
            <a href="/staff/front-desk">Front desk</a>
        </body></html>"#;

        let result = DepartmentScraper::parse(html, &base());
        assert_eq!(result.department_name.as_deref(), Some("Our People"));

        let urls: Vec<_> = result.professor_links.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://cs.example.edu/people/jane-smith", "https://cs.example.edu/faculty/bob"]
        );
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        let result = DepartmentScraper::parse("<html><body><p>Nothing here</p></body></html>", &base());
        assert!(result.professor_links.is_empty());
        assert!(result.department_name.is_none());
    }
}
