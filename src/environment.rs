// src/environment.rs
use crate::core::FsOps;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

/// Filesystem layout for state and prompt inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub data_path: PathBuf,
    pub profile_path: PathBuf,
    pub instruction_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data"),
            profile_path: PathBuf::from("profile.txt"),
            instruction_path: PathBuf::from("cover_letter_instruction.txt"),
        }
    }
}

impl EnvironmentConfig {
    /// Load paths for the current environment, from config.yaml when present
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&current_dir.join(CONFIG_FILE), &environment, &current_dir)
    }

    fn get_environment() -> String {
        std::env::var("ENVIRONMENT")
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn load_from(config_path: &Path, environment: &str, base_dir: &Path) -> Result<Self> {
        let env_config = if config_path.exists() {
            let config_content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config_file: ConfigFile = serde_yaml::from_str(&config_content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;

            match environment {
                "production" => config_file.production,
                _ => config_file.local,
            }
        } else {
            Self::default()
        };

        Ok(env_config.resolved_against(base_dir))
    }

    pub fn with_data_path(mut self, data_path: PathBuf) -> Self {
        self.data_path = data_path;
        self
    }

    fn resolved_against(self, base_dir: &Path) -> Self {
        Self {
            data_path: FsOps::normalize_path(base_dir, &self.data_path),
            profile_path: FsOps::normalize_path(base_dir, &self.profile_path),
            instruction_path: FsOps::normalize_path(base_dir, &self.instruction_path),
        }
    }

    pub fn urls_path(&self) -> PathBuf {
        self.data_path.join(crate::storage::URLS_FILE)
    }

    pub fn seen_jobs_path(&self) -> PathBuf {
        self.data_path.join(crate::storage::SEEN_JOBS_FILE)
    }

    pub fn bot_state_path(&self) -> PathBuf {
        self.data_path.join(crate::storage::BOT_STATE_FILE)
    }
}
