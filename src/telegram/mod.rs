// src/telegram/mod.rs
pub mod bot;
pub mod client;
pub mod commands;
pub mod digest;
pub mod types;

pub use bot::{run_polling, CommandHandler};
pub use client::{MessageSender, TelegramClient};
pub use commands::Command;
pub use digest::{deliver_digest, DeliverySummary};
pub use types::TextFormat;
