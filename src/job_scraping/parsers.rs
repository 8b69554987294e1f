// src/job_scraping/parsers.rs
use super::{classifier::mentions_design, Posting};
use crate::utils::truncate_chars;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, warn};
use url::Url;

const WISE_JOBS_DOMAIN: &str = "wise.jobs";
const WISE_COMPANY: &str = "Wise";
const FALLBACK_COMPANY: &str = "Company";

const MAX_DESCRIPTION_CHARS: usize = 500;
const MAX_WISE_TITLE_CHARS: usize = 200;
const MIN_GENERIC_TITLE_CHARS: usize = 5;
const MAX_GENERIC_TITLE_CHARS: usize = 300;

const WISE_CARD_TAGS: &[&str] = &["article", "div", "li"];
const GENERIC_CONTAINER_TAGS: &[&str] = &["article", "div", "li", "section"];
const SKIPPED_PATH_SEGMENTS: &[&str] = &["/login", "/sign-in", "/blog", "/posts"];

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector is valid"));
static WISE_JOB_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/job/[-a-z0-9]+-jid-\d+").expect("static regex is valid"));
static TEAM_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Team\s*[:\s]+(\w+)").expect("static regex is valid"));
static DESCRIPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Description\s*([^\n]+)").expect("static regex is valid"));

/// Posting extraction strategy, chosen by the source host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteParser {
    /// wise.jobs listing cards with `/job/<slug>-jid-<n>` links.
    WiseJobs,
    /// Any other site: design-looking links inside a container.
    Generic,
}

impl SiteParser {
    pub fn for_url(url: &str) -> Self {
        let on_wise = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.contains(WISE_JOBS_DOMAIN)))
            .unwrap_or(false);

        if on_wise {
            SiteParser::WiseJobs
        } else {
            SiteParser::Generic
        }
    }

    /// Extract candidate postings, deduplicated by absolute url in page order.
    pub fn extract(&self, html: &str, base_url: &str) -> Vec<Posting> {
        let base = match Url::parse(base_url) {
            Ok(base) => base,
            Err(e) => {
                warn!("Cannot resolve links against {}: {}", base_url, e);
                return Vec::new();
            }
        };

        let document = Html::parse_document(html);
        let candidates = match self {
            SiteParser::WiseJobs => parse_wise_jobs(&document, &base),
            SiteParser::Generic => parse_generic(&document, &base),
        };

        let postings = dedupe_by_url(candidates);
        debug!("{:?} parser found {} postings on {}", self, postings.len(), base_url);
        postings
    }
}

fn parse_wise_jobs(document: &Html, base: &Url) -> Vec<Posting> {
    let mut postings = Vec::new();

    for link in document.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if href.is_empty() || !WISE_JOB_HREF.is_match(href) {
            continue;
        }
        let Ok(job_url) = base.join(href) else {
            continue;
        };

        let title = compact_text(&link);
        if title.is_empty() || title.chars().count() > MAX_WISE_TITLE_CHARS {
            continue;
        }

        let mut team = String::new();
        let mut description = String::new();
        if let Some(card) = nearest_ancestor(&link, WISE_CARD_TAGS) {
            let card_text = spaced_text(&card);
            if let Some(caps) = TEAM_LABEL.captures(&card_text) {
                team = caps[1].to_string();
            }
            if let Some(caps) = DESCRIPTION_LABEL.captures(&card_text) {
                description = truncate_chars(&caps[1], MAX_DESCRIPTION_CHARS)
                    .trim()
                    .to_string();
            }
        }

        if description.is_empty() {
            description = title.clone();
        }

        postings.push(Posting {
            url: job_url.to_string(),
            title,
            team,
            company: WISE_COMPANY.to_string(),
            description,
        });
    }

    postings
}

fn parse_generic(document: &Html, base: &Url) -> Vec<Posting> {
    let mut postings = Vec::new();

    for link in document.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if href.is_empty() || href.starts_with('#') || href.contains("javascript:") {
            continue;
        }
        let Ok(full_url) = base.join(href) else {
            continue;
        };

        let path = full_url.path();
        if path.is_empty()
            || path == "/"
            || SKIPPED_PATH_SEGMENTS.iter().any(|seg| path.contains(seg))
        {
            continue;
        }

        let title = compact_text(&link);
        let title_len = title.chars().count();
        if !(MIN_GENERIC_TITLE_CHARS..=MAX_GENERIC_TITLE_CHARS).contains(&title_len) {
            continue;
        }

        let container_text = nearest_ancestor(&link, GENERIC_CONTAINER_TAGS)
            .map(|container| spaced_text(&container));
        let context = container_text.as_deref().unwrap_or(&title);
        if !mentions_design(context) {
            continue;
        }

        let description = match &container_text {
            Some(text) => truncate_chars(text, MAX_DESCRIPTION_CHARS),
            None => title.clone(),
        };

        postings.push(Posting {
            company: company_from_host(&full_url),
            url: full_url.to_string(),
            title,
            team: String::new(),
            description,
        });
    }

    postings
}

/// First label of the host, without a leading `www.`.
fn company_from_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    match host.split('.').next() {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => FALLBACK_COMPANY.to_string(),
    }
}

fn nearest_ancestor<'a>(element: &ElementRef<'a>, tags: &[&str]) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| tags.contains(&ancestor.value().name()))
}

/// Text nodes trimmed and glued together, as link titles are rendered.
fn compact_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect::<String>()
}

/// Text nodes trimmed and joined by single spaces.
fn spaced_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn dedupe_by_url(postings: Vec<Posting>) -> Vec<Posting> {
    let mut seen_urls = HashSet::new();
    postings
        .into_iter()
        .filter(|p| seen_urls.insert(p.url.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WISE_BASE: &str = "https://wise.jobs/jobs";

    #[test]
    fn test_dispatch_by_host() {
        assert_eq!(SiteParser::for_url("https://wise.jobs/jobs"), SiteParser::WiseJobs);
        assert_eq!(
            SiteParser::for_url("https://careers.wise.jobs/en"),
            SiteParser::WiseJobs
        );
        assert_eq!(SiteParser::for_url("https://example.com/careers"), SiteParser::Generic);
        assert_eq!(SiteParser::for_url("not a url"), SiteParser::Generic);
    }

    #[test]
    fn test_wise_card_with_team_label() {
        let html = r#"
            <ul>
              <li>
                <div class="card">
                  <a href="/job/product-designer-jid-42">Product Designer</a>
                  <p>Team: Brand</p>
                  <p>Description Shape how millions move money.</p>
                </div>
              </li>
            </ul>"#;

        let postings = SiteParser::WiseJobs.extract(html, WISE_BASE);

        assert_eq!(postings.len(), 1);
        let posting = &postings[0];
        assert_eq!(posting.url, "https://wise.jobs/job/product-designer-jid-42");
        assert_eq!(posting.title, "Product Designer");
        assert_eq!(posting.team, "Brand");
        assert_eq!(posting.company, "Wise");
        assert_eq!(posting.description, "Shape how millions move money.");
    }

    #[test]
    fn test_wise_team_after_non_breaking_space() {
        let html = r#"
            <div class="card">
              <a href="/job/brand-designer-jid-5">Brand Designer</a>
              <p>Team:&nbsp;Brand</p>
            </div>"#;

        let postings = SiteParser::WiseJobs.extract(html, WISE_BASE);

        assert_eq!(postings[0].team, "Brand");
    }

    #[test]
    fn test_wise_team_with_non_ascii_name() {
        let html = r#"
            <div class="card">
              <a href="/job/motion-designer-jid-6">Motion Designer</a>
              <p>Team: Über Design</p>
            </div>"#;

        let postings = SiteParser::WiseJobs.extract(html, WISE_BASE);

        assert_eq!(postings[0].team, "Über");
    }

    #[test]
    fn test_wise_description_falls_back_to_title() {
        let html = r#"<div><a href="/job/ux-writer-jid-7">UX Writer</a></div>"#;

        let postings = SiteParser::WiseJobs.extract(html, WISE_BASE);

        assert_eq!(postings[0].description, "UX Writer");
        assert_eq!(postings[0].team, "");
    }

    #[test]
    fn test_wise_ignores_non_job_links_and_dedupes() {
        let html = r#"
            <div>
              <a href="/about">About us</a>
              <a href="/job/brand-designer-jid-1">Brand Designer</a>
              <a href="https://wise.jobs/job/brand-designer-jid-1">Brand Designer</a>
              <a href="/job/visual-designer-jid-2"></a>
              <a href="/job/product-designer-jid-3">Product Designer</a>
            </div>"#;

        let postings = SiteParser::WiseJobs.extract(html, WISE_BASE);
        let urls: Vec<&str> = postings.iter().map(|p| p.url.as_str()).collect();

        assert_eq!(
            urls,
            vec![
                "https://wise.jobs/job/brand-designer-jid-1",
                "https://wise.jobs/job/product-designer-jid-3",
            ]
        );
    }

    #[test]
    fn test_wise_rejects_overlong_title() {
        let long_title = "x".repeat(201);
        let html = format!(r#"<div><a href="/job/a-jid-1">{}</a></div>"#, long_title);

        assert!(SiteParser::WiseJobs.extract(&html, WISE_BASE).is_empty());
    }

    #[test]
    fn test_generic_keeps_design_links() {
        let html = r#"
            <section>
              <article>
                <h2>Open roles</h2>
                <a href="/careers/senior-designer">Senior Product Designer</a>
                <span>Remote, Europe</span>
              </article>
            </section>"#;

        let postings = SiteParser::Generic.extract(html, "https://www.acme.io/careers");

        assert_eq!(postings.len(), 1);
        let posting = &postings[0];
        assert_eq!(posting.url, "https://www.acme.io/careers/senior-designer");
        assert_eq!(posting.company, "acme");
        assert_eq!(posting.team, "");
        assert_eq!(
            posting.description,
            "Open roles Senior Product Designer Remote, Europe"
        );
    }

    #[test]
    fn test_generic_drops_links_without_design_context() {
        let html = r#"
            <div>
              <a href="/careers/backend-engineer">Backend Engineer</a>
              <p>Rust, Postgres, Kafka</p>
            </div>"#;

        assert!(SiteParser::Generic
            .extract(html, "https://example.com/careers")
            .is_empty());
    }

    #[test]
    fn test_generic_skips_navigation_and_auth_links() {
        let html = r##"
            <div>
              <p>Design jobs</p>
              <a href="/">Design home</a>
              <a href="#top">Design anchor</a>
              <a href="javascript:void(0)">Design script</a>
              <a href="/login">Design login</a>
              <a href="/blog/design-trends">Design blog post</a>
              <a href="/jobs/ui">UI</a>
              <a href="/jobs/graphic-designer">Graphic Designer</a>
            </div>"##;

        let postings = SiteParser::Generic.extract(html, "https://example.com/jobs");
        let titles: Vec<&str> = postings.iter().map(|p| p.title.as_str()).collect();

        assert_eq!(titles, vec!["Graphic Designer"]);
    }

    #[test]
    fn test_generic_link_without_container_uses_title() {
        let html = r#"<html><body><a href="/jobs/7">Motion Designer</a></body></html>"#;

        let postings = SiteParser::Generic.extract(html, "https://example.com/jobs");

        assert_eq!(postings.len(), 1);
        let posting = &postings[0];
        assert_eq!(posting.url, "https://example.com/jobs/7");
        assert_eq!(posting.title, "Motion Designer");
        assert_eq!(posting.description, "Motion Designer");
        assert_eq!(posting.company, "example");
    }

    #[test]
    fn test_generic_link_without_container_needs_design_title() {
        let html = r#"<html><body><a href="/jobs/8">Backend Engineer</a></body></html>"#;

        assert!(SiteParser::Generic
            .extract(html, "https://example.com/jobs")
            .is_empty());
    }

    #[test]
    fn test_generic_description_truncated_to_limit() {
        let filler = "design ".repeat(200);
        let html = format!(
            r#"<div><a href="/jobs/1">Visual Designer</a><p>{}</p></div>"#,
            filler
        );

        let postings = SiteParser::Generic.extract(&html, "https://example.com/jobs");

        assert_eq!(postings[0].description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn test_generic_preserves_page_order() {
        let html = r#"
            <ul>
              <li><a href="/jobs/3">Brand Designer</a></li>
              <li><a href="/jobs/1">UX Researcher</a></li>
              <li><a href="/jobs/2">Creative Lead</a></li>
            </ul>"#;

        let postings = SiteParser::Generic.extract(html, "https://example.com/jobs");
        let urls: Vec<&str> = postings.iter().map(|p| p.url.as_str()).collect();

        assert_eq!(
            urls,
            vec![
                "https://example.com/jobs/3",
                "https://example.com/jobs/1",
                "https://example.com/jobs/2",
            ]
        );
    }

    #[test]
    fn test_invalid_base_url_yields_nothing() {
        let html = r#"<div><a href="/job/a-jid-1">Designer</a></div>"#;
        assert!(SiteParser::WiseJobs.extract(html, "::nope::").is_empty());
    }

    #[test]
    fn test_company_from_host_fallback() {
        let url = Url::parse("https://www.design-studio.co.uk/jobs").unwrap();
        assert_eq!(company_from_host(&url), "design-studio");

        let url = Url::parse("file:///tmp/jobs.html").unwrap();
        assert_eq!(company_from_host(&url), "Company");
    }
}
