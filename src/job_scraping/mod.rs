// src/job_scraping/mod.rs
use serde::{Deserialize, Serialize};

pub mod classifier;
pub mod fetcher;
pub mod parsers;
pub mod pipeline;

pub use fetcher::{HttpFetcher, PageFetcher, ScrapeError};
pub use parsers::SiteParser;
pub use pipeline::{ScrapePipeline, ScrapeReport, UrlOutcome};

/// One scraped job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub team: String,
    pub company: String,
    pub description: String,
}

impl Posting {
    /// Dedupe key: the url, or the title for postings without one.
    pub fn identifier(&self) -> &str {
        if self.url.is_empty() {
            &self.title
        } else {
            &self.url
        }
    }
}
