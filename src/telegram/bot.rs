// src/telegram/bot.rs
use super::commands::{Command, HELP, USAGE};
use super::digest::{deliver_digest, DeliverySummary};
use super::{MessageSender, TelegramClient, TextFormat};
use crate::cover_letter::CoverLetterGenerator;
use crate::job_scraping::{PageFetcher, Posting, ScrapePipeline};
use crate::storage::{AddOutcome, BotStateStore, RemoveOutcome, SeenStore, UrlStore};
use crate::utils::normalize_source_url;
use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

const POLL_TIMEOUT_SECS: u64 = 30;
const POLL_RETRY_PAUSE: Duration = Duration::from_secs(5);

/// Reacts to chat commands and runs the daily digest.
pub struct CommandHandler<F, S> {
    pipeline: ScrapePipeline<F, S>,
    urls: UrlStore,
    state: BotStateStore,
    generator: Box<dyn CoverLetterGenerator>,
    resume_pdf_url: String,
}

impl<F: PageFetcher, S: SeenStore> CommandHandler<F, S> {
    pub fn new(
        pipeline: ScrapePipeline<F, S>,
        urls: UrlStore,
        state: BotStateStore,
        generator: Box<dyn CoverLetterGenerator>,
        resume_pdf_url: String,
    ) -> Self {
        Self {
            pipeline,
            urls,
            state,
            generator,
            resume_pdf_url,
        }
    }

    pub async fn handle(
        &self,
        sender: &dyn MessageSender,
        chat_id: i64,
        command: Command,
    ) -> Result<()> {
        info!("Chat {} sent {:?}", chat_id, command);

        match command {
            Command::Start => {
                if let Err(e) = self.state.save_chat_id(chat_id).await {
                    warn!("Failed to remember chat {}: {:#}", chat_id, e);
                }
                reply(sender, chat_id, USAGE).await
            }

            Command::Help => reply(sender, chat_id, HELP).await,

            Command::AddUrl(None) => {
                reply(sender, chat_id, "Give me a link: /addurl https://example.com/jobs").await
            }
            Command::AddUrl(Some(raw)) => {
                let url = normalize_source_url(&raw);
                match self.urls.add(&url).await? {
                    AddOutcome::AlreadyPresent => {
                        reply(sender, chat_id, "This link is already in the list.").await
                    }
                    AddOutcome::Added { total } => {
                        let text = format!("Added: {}\nLinks in total: {}", url, total);
                        reply(sender, chat_id, &text).await
                    }
                }
            }

            Command::RemoveUrl(None) => {
                reply(sender, chat_id, "Give me a link: /removeurl https://example.com/jobs").await
            }
            Command::RemoveUrl(Some(raw)) => {
                let url = normalize_source_url(&raw);
                match self.urls.remove(&url).await? {
                    RemoveOutcome::NotFound => {
                        reply(sender, chat_id, "There is no such link in the list.").await
                    }
                    RemoveOutcome::Removed { remaining } => {
                        let text = format!("Removed: {}\nLinks left: {}", url, remaining);
                        reply(sender, chat_id, &text).await
                    }
                }
            }

            Command::ListUrls => {
                let urls = self.urls.load().await;
                if urls.is_empty() {
                    return reply(sender, chat_id, "The list is empty. Add a link: /addurl <url>")
                        .await;
                }
                let lines: Vec<String> = urls.iter().map(|u| format!("• {}", u)).collect();
                let text = format!("Pages being monitored:\n\n{}", lines.join("\n"));
                reply(sender, chat_id, &text).await
            }

            Command::Check => self.check(sender, chat_id).await,
        }
    }

    async fn check(&self, sender: &dyn MessageSender, chat_id: i64) -> Result<()> {
        sender
            .send_message(chat_id, "Checking vacancies…", TextFormat::Plain)
            .await?;

        let urls = self.urls.load().await;
        if urls.is_empty() {
            return sender
                .send_message(chat_id, "No links yet. Add one: /addurl <url>", TextFormat::Plain)
                .await;
        }

        let report = match self.pipeline.run(&urls).await {
            Ok(report) => report,
            Err(e) => {
                error!("Scrape run failed: {:#}", e);
                return sender
                    .send_message(
                        chat_id,
                        &format!("Failed to collect vacancies: {:#}", e),
                        TextFormat::Plain,
                    )
                    .await;
            }
        };

        if report.new_postings.is_empty() {
            return sender
                .send_message(chat_id, "No new design vacancies found.", TextFormat::Plain)
                .await;
        }

        let summary = self.deliver(sender, chat_id, &report.new_postings).await;
        let text = if summary.all_sent() {
            format!("Done. Vacancies sent: {}.", summary.sent)
        } else {
            format!("Sent {} of {} vacancies.", summary.sent, summary.total)
        };
        sender.send_message(chat_id, &text, TextFormat::Plain).await
    }

    async fn deliver(
        &self,
        sender: &dyn MessageSender,
        chat_id: i64,
        postings: &[Posting],
    ) -> DeliverySummary {
        deliver_digest(
            sender,
            chat_id,
            self.generator.as_ref(),
            postings,
            &self.resume_pdf_url,
        )
        .await
    }

    /// Scrape and send new postings to the chat saved by `/start`.
    ///
    /// `Ok(None)` when there was nothing to do.
    pub async fn run_daily(&self, sender: &dyn MessageSender) -> Result<Option<DeliverySummary>> {
        let Some(chat_id) = self.state.load_chat_id().await else {
            warn!("No chat_id saved; the user should /start the bot first.");
            return Ok(None);
        };

        let urls = self.urls.load().await;
        if urls.is_empty() {
            info!("No source urls configured");
            return Ok(None);
        }

        let report = self.pipeline.run(&urls).await?;
        if report.new_postings.is_empty() {
            info!("No new design postings today");
            return Ok(None);
        }

        Ok(Some(self.deliver(sender, chat_id, &report.new_postings).await))
    }
}

async fn reply(sender: &dyn MessageSender, chat_id: i64, text: &str) -> Result<()> {
    sender.send_message(chat_id, text, TextFormat::Plain).await
}

/// Long-poll Telegram and dispatch commands until Ctrl-C.
pub async fn run_polling<F, S>(client: &TelegramClient, handler: &CommandHandler<F, S>) -> Result<()>
where
    F: PageFetcher,
    S: SeenStore,
{
    run_polling_until(client, handler, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Poll and dispatch until `shutdown` resolves, also while a command is running.
pub async fn run_polling_until<F, S, D>(
    client: &TelegramClient,
    handler: &CommandHandler<F, S>,
    shutdown: D,
) -> Result<()>
where
    F: PageFetcher,
    S: SeenStore,
    D: Future<Output = ()>,
{
    info!("Bot is polling for updates");
    tokio::pin!(shutdown);
    let mut offset: Option<i64> = None;

    loop {
        let updates = tokio::select! {
            _ = &mut shutdown => {
                info!("Shutting down bot");
                return Ok(());
            }
            updates = client.get_updates(offset, POLL_TIMEOUT_SECS) => updates,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                warn!("Polling failed, retrying: {:#}", e);
                tokio::select! {
                    _ = &mut shutdown => {
                        info!("Shutting down bot");
                        return Ok(());
                    }
                    _ = tokio::time::sleep(POLL_RETRY_PAUSE) => continue,
                }
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(command) = message.text.as_deref().and_then(Command::parse) else {
                continue;
            };

            let chat_id = message.chat.id;
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down bot while handling a command in chat {}", chat_id);
                    return Ok(());
                }
                result = handler.handle(client, chat_id, command) => {
                    if let Err(e) = result {
                        error!("Failed to handle command in chat {}: {:#}", chat_id, e);
                    }
                }
            }
        }
    }
}
