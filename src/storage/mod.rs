// src/storage/mod.rs
//! JSON-file state: seen postings, source urls, bot chat

pub mod bot_state;
pub mod seen_store;
pub mod url_store;

pub use bot_state::BotStateStore;
pub use seen_store::{JsonSeenStore, MemorySeenStore, SeenSet, SeenStore};
pub use url_store::{AddOutcome, RemoveOutcome, UrlStore};

pub const URLS_FILE: &str = "urls.json";
pub const SEEN_JOBS_FILE: &str = "seen_jobs.json";
pub const BOT_STATE_FILE: &str = "bot_state.json";
