pub mod cli;
pub mod core;
pub mod cover_letter;
pub mod environment;
pub mod job_scraping;
pub mod storage;
pub mod telegram;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::core::ConfigManager;
pub use job_scraping::{Posting, ScrapePipeline, ScrapeReport, SiteParser, UrlOutcome};
