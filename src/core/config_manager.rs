// src/core/config_manager.rs
//! Unified configuration: paths from environment.rs, secrets and endpoints from env vars

use crate::environment::EnvironmentConfig;
use crate::job_scraping::fetcher::DEFAULT_FETCH_TIMEOUT_SECS;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_YANDEX_FOLDER_ID: &str = "b1g6rst3sps7hhu8tqla";
const DEFAULT_COMPLETION_URL: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";
const DEFAULT_RESUME_PDF_URL: &str = "https://danyavidmich.com/cv_vidmich_designer.pdf";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub telegram: TelegramConfig,
    pub llm: LlmConfig,
    pub scrape: ScrapeConfig,
    pub resume_pdf_url: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub iam_token: String,
    pub folder_id: String,
    pub model_uri: String,
    pub completion_url: String,
    pub timeout_seconds: u64,
    pub profile_path: PathBuf,
    pub instruction_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub timeout_seconds: u64,
}

impl ConfigManager {
    /// Load all configurations from the process environment
    pub fn load() -> Result<Self> {
        let environment = EnvironmentConfig::load()?;
        Self::from_vars(environment, |key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; blank values count as unset.
    pub fn from_vars<F>(environment: EnvironmentConfig, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let telegram = TelegramConfig {
            bot_token: get("TELEGRAM_BOT_TOKEN").unwrap_or_default(),
            api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
        };

        let folder_id =
            get("YANDEX_FOLDER_ID").unwrap_or_else(|| DEFAULT_YANDEX_FOLDER_ID.to_string());
        let llm = LlmConfig {
            api_key: get("YANDEX_API_KEY").unwrap_or_default(),
            iam_token: get("YANDEX_IAM_TOKEN").unwrap_or_default(),
            model_uri: get("YANDEX_MODEL_URI")
                .unwrap_or_else(|| format!("gpt://{}/aliceai-llm/latest", folder_id)),
            folder_id,
            completion_url: get("YANDEX_COMPLETION_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_URL.to_string()),
            timeout_seconds: DEFAULT_LLM_TIMEOUT_SECS,
            profile_path: environment.profile_path.clone(),
            instruction_path: environment.instruction_path.clone(),
        };

        let timeout_seconds = match get("SCRAPE_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("SCRAPE_TIMEOUT_SECS must be a number, got {}", raw))?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        let resume_pdf_url =
            get("RESUME_PDF_URL").unwrap_or_else(|| DEFAULT_RESUME_PDF_URL.to_string());

        info!("Data directory: {}", environment.data_path.display());

        Ok(Self {
            environment,
            telegram,
            llm,
            scrape: ScrapeConfig { timeout_seconds },
            resume_pdf_url,
        })
    }

    pub fn with_data_path(mut self, data_path: PathBuf) -> Self {
        self.environment = self.environment.with_data_path(data_path);
        self
    }

    pub fn require_bot_token(&self) -> Result<&str> {
        if self.telegram.bot_token.is_empty() {
            anyhow::bail!("TELEGRAM_BOT_TOKEN environment variable not set");
        }
        Ok(&self.telegram.bot_token)
    }

    /// Ensure the state directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        super::FsOps::ensure_dir_exists(&self.environment.data_path).await
    }
}
