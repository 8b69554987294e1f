// src/telegram/client.rs
use super::types::{ApiResponse, GetUpdatesRequest, SendMessageRequest, TextFormat, Update};
use crate::core::config_manager::TelegramConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, error};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Anything that can post a message into a chat.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<()>;
}

/// Minimal Telegram Bot API client: long polling plus sendMessage.
pub struct TelegramClient {
    client: Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        if config.bot_token.is_empty() {
            anyhow::bail!("Telegram bot token is empty");
        }

        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
        })
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
            allowed_updates: vec!["message"],
        };

        self.call("getUpdates", &request, timeout_secs + REQUEST_TIMEOUT_SECS)
            .await
    }

    async fn call<T, R>(&self, method: &str, payload: &T, timeout_secs: u64) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/bot{}/{}", self.api_url, self.token, method);
        debug!("Calling Telegram method {}", method);

        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(timeout_secs))
            .json(payload)
            .send()
            .await
            .with_context(|| format!("Failed to call Telegram method {}", method))?;

        let status = response.status();
        let body: ApiResponse<R> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse Telegram {} response", method))?;

        if !status.is_success() || !body.ok {
            let description = body.description.unwrap_or_else(|| status.to_string());
            error!("Telegram {} failed: {}", method, description);
            anyhow::bail!("Telegram {} failed: {}", method, description);
        }

        body.result
            .with_context(|| format!("Telegram {} returned no result", method))
    }
}

#[async_trait]
impl MessageSender for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<()> {
        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: format.parse_mode(),
            disable_web_page_preview: true,
        };

        let _: serde_json::Value = self
            .call("sendMessage", &request, REQUEST_TIMEOUT_SECS)
            .await?;
        Ok(())
    }
}
