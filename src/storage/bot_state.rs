// src/storage/bot_state.rs
use crate::core::FsOps;
use anyhow::Result;
use std::path::PathBuf;
use tracing::warn;

const CHAT_ID_KEY: &str = "chat_id";

/// Small JSON document remembering which chat receives the daily digest.
pub struct BotStateStore {
    path: PathBuf,
}

impl BotStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn load_chat_id(&self) -> Option<i64> {
        match FsOps::read_json::<serde_json::Value>(&self.path).await {
            Ok(Some(state)) => state.get(CHAT_ID_KEY).and_then(|v| v.as_i64()),
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable bot state {}: {:#}", self.path.display(), e);
                None
            }
        }
    }

    /// Store the chat id, keeping any other keys already in the file.
    pub async fn save_chat_id(&self, chat_id: i64) -> Result<()> {
        let mut state = match FsOps::read_json::<serde_json::Value>(&self.path).await {
            Ok(Some(serde_json::Value::Object(map))) => map,
            _ => serde_json::Map::new(),
        };
        state.insert(CHAT_ID_KEY.to_string(), serde_json::Value::from(chat_id));

        FsOps::write_json_atomic(&self.path, &serde_json::Value::Object(state)).await
    }
}
