// src/cover_letter/yandex_client.rs
use super::types::{CompletionMessage, CompletionOptions, CompletionRequest, CompletionResponse};
use super::CoverLetterGenerator;
use crate::core::{config_manager::LlmConfig, FsOps};
use crate::utils::truncate_chars;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info, warn};

const MAX_PROMPT_DESCRIPTION_CHARS: usize = 3000;
const TEMPERATURE: f32 = 0.4;
const MAX_TOKENS: u32 = 1024;

pub struct YandexGptClient {
    client: Client,
    config: LlmConfig,
}

impl YandexGptClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        if config.iam_token.is_empty() && config.api_key.is_empty() {
            warn!("Neither YANDEX_IAM_TOKEN nor YANDEX_API_KEY is set; requests go unauthenticated");
        }

        Ok(Self { client, config })
    }

    fn auth_header(&self) -> Option<String> {
        if !self.config.iam_token.is_empty() {
            Some(format!("Bearer {}", self.config.iam_token))
        } else if !self.config.api_key.is_empty() {
            Some(format!("Api-Key {}", self.config.api_key))
        } else {
            None
        }
    }

    fn build_prompt(profile: &str, job_title: &str, job_description: &str, company: &str) -> String {
        let company = if company.is_empty() { "Company" } else { company };
        format!(
            r#"Candidate profile (use only this for facts):

{}

---

Job to apply for:
- Title: {}
- Company: {}
- Description (excerpt): {}

Write a short cover letter for this job in English. Output only the letter text."#,
            profile,
            job_title,
            company,
            truncate_chars(job_description, MAX_PROMPT_DESCRIPTION_CHARS)
        )
    }

    async fn build_request(
        &self,
        job_title: &str,
        job_description: &str,
        company: &str,
    ) -> Result<CompletionRequest> {
        let instruction = FsOps::read_text_or_empty(&self.config.instruction_path).await?;
        let profile = FsOps::read_text_or_empty(&self.config.profile_path).await?;

        Ok(CompletionRequest {
            folder_id: self.config.folder_id.clone(),
            model_uri: self.config.model_uri.clone(),
            completion_options: CompletionOptions {
                temperature: TEMPERATURE,
                max_tokens: MAX_TOKENS,
            },
            messages: vec![
                CompletionMessage {
                    role: "system".to_string(),
                    text: instruction,
                },
                CompletionMessage {
                    role: "user".to_string(),
                    text: Self::build_prompt(&profile, job_title, job_description, company),
                },
            ],
        })
    }
}

#[async_trait]
impl CoverLetterGenerator for YandexGptClient {
    async fn generate(&self, job_title: &str, job_description: &str, company: &str) -> Result<String> {
        let request = self
            .build_request(job_title, job_description, company)
            .await
            .context("Failed to prepare cover letter prompt")?;

        info!("Requesting cover letter for: {}", job_title);

        let mut builder = self
            .client
            .post(&self.config.completion_url)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(auth) = self.auth_header() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to Yandex GPT")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Yandex GPT error {}: {}", status, error_text);
            anyhow::bail!("Yandex GPT returned error {}: {}", status, error_text);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse Yandex GPT response")?;

        let letter = completion
            .result
            .alternatives
            .into_iter()
            .next()
            .and_then(|alt| alt.message)
            .map(|message| message.text.trim().to_string())
            .unwrap_or_default();

        info!("Received cover letter ({} chars)", letter.chars().count());
        Ok(letter)
    }
}
