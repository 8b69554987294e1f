// src/job_scraping/pipeline.rs
use super::{classifier::is_design_related, PageFetcher, Posting, SiteParser};
use crate::storage::{SeenSet, SeenStore};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// What happened to one source url during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlOutcome {
    Scraped {
        url: String,
        /// Design postings found on the page.
        found: usize,
        /// Of those, not seen before.
        new: usize,
    },
    Failed {
        url: String,
        reason: String,
    },
}

impl UrlOutcome {
    pub fn url(&self) -> &str {
        match self {
            UrlOutcome::Scraped { url, .. } | UrlOutcome::Failed { url, .. } => url,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, UrlOutcome::Failed { .. })
    }
}

#[derive(Debug, Default)]
pub struct ScrapeReport {
    pub new_postings: Vec<Posting>,
    pub outcomes: Vec<UrlOutcome>,
}

impl ScrapeReport {
    pub fn failures(&self) -> impl Iterator<Item = &UrlOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

/// Fetch, parse, classify and dedupe a list of source pages, one at a time.
pub struct ScrapePipeline<F, S> {
    fetcher: F,
    seen_store: S,
}

impl<F: PageFetcher, S: SeenStore> ScrapePipeline<F, S> {
    pub fn new(fetcher: F, seen_store: S) -> Self {
        Self {
            fetcher,
            seen_store,
        }
    }

    pub fn seen_store(&self) -> &S {
        &self.seen_store
    }

    /// Returns the new design postings across `urls` and records them as seen.
    ///
    /// A failing url is logged and reported in `outcomes`; only a failure to
    /// persist the seen-set is returned as an error.
    pub async fn run(&self, urls: &[String]) -> Result<ScrapeReport> {
        let mut seen = self.seen_store.load().await;
        let mut report = ScrapeReport::default();

        for url in urls {
            let outcome = match self.design_postings_for(url).await {
                Ok(postings) => {
                    let found = postings.len();
                    let new = Self::keep_unseen(postings, &mut seen, &mut report.new_postings);
                    info!("{}: {} design postings, {} new", url, found, new);
                    UrlOutcome::Scraped {
                        url: url.clone(),
                        found,
                        new,
                    }
                }
                Err(e) => {
                    warn!("Error scraping {}: {}", url, e);
                    UrlOutcome::Failed {
                        url: url.clone(),
                        reason: e.to_string(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        self.seen_store
            .save(&seen)
            .await
            .context("Failed to persist seen postings")?;

        info!(
            "Scrape finished: {} new postings from {} urls ({} failed)",
            report.new_postings.len(),
            urls.len(),
            report.failures().count()
        );
        Ok(report)
    }

    async fn design_postings_for(&self, url: &str) -> Result<Vec<Posting>, super::ScrapeError> {
        let html = self.fetcher.fetch(url).await?;
        let postings = SiteParser::for_url(url)
            .extract(&html, url)
            .into_iter()
            .filter(is_design_related)
            .collect();
        Ok(postings)
    }

    fn keep_unseen(postings: Vec<Posting>, seen: &mut SeenSet, out: &mut Vec<Posting>) -> usize {
        let mut new = 0;
        for posting in postings {
            let id = posting.identifier();
            if id.is_empty() || !seen.insert(id.to_string()) {
                continue;
            }
            out.push(posting);
            new += 1;
        }
        new
    }
}
