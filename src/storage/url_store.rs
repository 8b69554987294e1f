// src/storage/url_store.rs
use crate::core::FsOps;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

pub const DEFAULT_SOURCE_URL: &str = "https://wise.jobs/jobs";

#[derive(Debug, Default, Serialize, Deserialize)]
struct UrlsFile {
    #[serde(default)]
    urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { total: usize },
    AlreadyPresent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { remaining: usize },
    NotFound,
}

/// Ordered list of listing pages to poll, kept as `{"urls": [...]}`.
pub struct UrlStore {
    path: PathBuf,
}

impl UrlStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Missing file: the default board. Unreadable file: empty list.
    pub async fn load(&self) -> Vec<String> {
        match FsOps::read_json::<UrlsFile>(&self.path).await {
            Ok(Some(file)) => file.urls,
            Ok(None) => vec![DEFAULT_SOURCE_URL.to_string()],
            Err(e) => {
                warn!("Ignoring unreadable url list {}: {:#}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    pub async fn save(&self, urls: &[String]) -> Result<()> {
        let file = UrlsFile {
            urls: urls.to_vec(),
        };
        FsOps::write_json_atomic(&self.path, &file).await
    }

    /// Append `url` (already normalized) unless it is present.
    pub async fn add(&self, url: &str) -> Result<AddOutcome> {
        let mut urls = self.load().await;
        if urls.iter().any(|u| u == url) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        urls.push(url.to_string());
        self.save(&urls).await?;
        info!("Added source url {} ({} total)", url, urls.len());
        Ok(AddOutcome::Added { total: urls.len() })
    }

    pub async fn remove(&self, url: &str) -> Result<RemoveOutcome> {
        let mut urls = self.load().await;
        let Some(pos) = urls.iter().position(|u| u == url) else {
            return Ok(RemoveOutcome::NotFound);
        };

        urls.remove(pos);
        self.save(&urls).await?;
        info!("Removed source url {} ({} remaining)", url, urls.len());
        Ok(RemoveOutcome::Removed {
            remaining: urls.len(),
        })
    }
}
