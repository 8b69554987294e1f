// src/storage/seen_store.rs
use crate::core::FsOps;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

pub type SeenSet = BTreeSet<String>;

/// Durable set of posting identifiers already surfaced to the user.
#[async_trait]
pub trait SeenStore: Send + Sync {
    /// Never fails: a missing or unreadable store is an empty set.
    async fn load(&self) -> SeenSet;

    async fn save(&self, seen: &SeenSet) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SeenFile {
    #[serde(default)]
    seen: Vec<String>,
}

/// `{"seen": [...]}` document on disk, overwritten on every save.
pub struct JsonSeenStore {
    path: PathBuf,
}

impl JsonSeenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl SeenStore for JsonSeenStore {
    async fn load(&self) -> SeenSet {
        match FsOps::read_json::<SeenFile>(&self.path).await {
            Ok(Some(file)) => file.seen.into_iter().collect(),
            Ok(None) => SeenSet::new(),
            Err(e) => {
                warn!("Ignoring unreadable seen-set {}: {:#}", self.path.display(), e);
                SeenSet::new()
            }
        }
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        let file = SeenFile {
            seen: seen.iter().cloned().collect(),
        };
        FsOps::write_json_atomic(&self.path, &file).await
    }
}

/// In-process store, for tests and dry runs.
#[derive(Default)]
pub struct MemorySeenStore {
    seen: Mutex<SeenSet>,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seen<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: Mutex::new(ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn snapshot(&self) -> SeenSet {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn load(&self) -> SeenSet {
        self.snapshot()
    }

    async fn save(&self, seen: &SeenSet) -> Result<()> {
        let mut guard = self
            .seen
            .lock()
            .map_err(|_| anyhow::anyhow!("seen-set lock poisoned"))?;
        *guard = seen.clone();
        Ok(())
    }
}
