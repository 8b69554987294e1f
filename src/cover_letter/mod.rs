// src/cover_letter/mod.rs
use anyhow::Result;
use async_trait::async_trait;

pub mod types;
pub mod yandex_client;

pub use yandex_client::YandexGptClient;

/// Writes a cover letter for one posting.
#[async_trait]
pub trait CoverLetterGenerator: Send + Sync {
    async fn generate(&self, job_title: &str, job_description: &str, company: &str) -> Result<String>;
}
