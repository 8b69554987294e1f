// src/test_support.rs
//! Fakes for the network-facing traits

use crate::cover_letter::CoverLetterGenerator;
use crate::job_scraping::{PageFetcher, ScrapeError};
use crate::telegram::{MessageSender, TextFormat};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Serves canned pages; unknown urls answer 503.
pub struct StubFetcher {
    pages: HashMap<String, String>,
}

impl StubFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: 503,
            })
    }
}

/// Records sent messages; fails for texts containing any marker.
#[derive(Default)]
pub struct RecordingSender {
    fail_markers: Vec<String>,
    sent: Mutex<Vec<(i64, String, TextFormat)>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(markers: &[&str]) -> Self {
        Self {
            fail_markers: markers.iter().map(|m| m.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<(i64, String, TextFormat)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.messages().into_iter().map(|(_, text, _)| text).collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_message(&self, chat_id: i64, text: &str, format: TextFormat) -> Result<()> {
        if self.fail_markers.iter().any(|m| text.contains(m.as_str())) {
            anyhow::bail!("Forbidden: bot was blocked by the user");
        }
        self.sent
            .lock()
            .unwrap()
            .push((chat_id, text.to_string(), format));
        Ok(())
    }
}

/// Returns the same letter every time, or always fails.
pub struct FixedGenerator {
    letter: Option<String>,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl FixedGenerator {
    pub fn ok(letter: &str) -> Self {
        Self {
            letter: Some(letter.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            letter: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CoverLetterGenerator for FixedGenerator {
    async fn generate(&self, job_title: &str, job_description: &str, company: &str) -> Result<String> {
        self.calls.lock().unwrap().push((
            job_title.to_string(),
            job_description.to_string(),
            company.to_string(),
        ));
        match &self.letter {
            Some(letter) => Ok(letter.clone()),
            None => anyhow::bail!("Yandex GPT returned error 401 Unauthorized"),
        }
    }
}

/// Signals `started` and then never finishes, like a hung LLM call.
pub struct StalledGenerator {
    started: Arc<Notify>,
}

impl StalledGenerator {
    pub fn new(started: Arc<Notify>) -> Self {
        Self { started }
    }
}

#[async_trait]
impl CoverLetterGenerator for StalledGenerator {
    async fn generate(&self, _job_title: &str, _job_description: &str, _company: &str) -> Result<String> {
        self.started.notify_one();
        std::future::pending().await
    }
}
