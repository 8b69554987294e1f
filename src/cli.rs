// src/cli.rs
use crate::core::ConfigManager;
use crate::cover_letter::{CoverLetterGenerator, YandexGptClient};
use crate::job_scraping::{HttpFetcher, ScrapePipeline};
use crate::storage::{AddOutcome, BotStateStore, JsonSeenStore, RemoveOutcome, UrlStore};
use crate::telegram::{run_polling, CommandHandler, TelegramClient};
use crate::utils::normalize_source_url;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "design-jobs")]
#[command(about = "Scrape job boards for design vacancies and deliver them with cover letters")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,

    /// Directory holding urls.json, seen_jobs.json and bot_state.json
    #[arg(long, global = true, env = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum CliCommand {
    /// Run the Telegram bot (long polling)
    Bot,
    /// Scrape once and send new vacancies to the saved chat
    Daily,
    /// Scrape once and print new vacancies as JSON
    Scrape,
    /// Manage the monitored pages
    Urls {
        #[command(subcommand)]
        action: UrlsAction,
    },
    /// Generate a single cover letter
    Letter {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Subcommand)]
pub enum UrlsAction {
    /// Show all monitored pages
    List,
    /// Add a page
    Add { url: String },
    /// Remove a page
    Remove { url: String },
}

pub async fn handle_command(cli: Cli, mut config: ConfigManager) -> Result<()> {
    if let Some(dir) = cli.data_dir {
        config = config.with_data_path(dir);
    }
    config.ensure_directories().await?;
    info!("Data: {}", config.environment.data_path.display());

    let env = &config.environment;
    let urls = UrlStore::new(env.urls_path());

    match cli.command {
        CliCommand::Bot => {
            config.require_bot_token()?;
            let client = TelegramClient::new(&config.telegram)?;
            let handler = command_handler(&config)?;
            run_polling(&client, &handler).await?;
        }

        CliCommand::Daily => {
            config.require_bot_token()?;
            let client = TelegramClient::new(&config.telegram)?;
            let handler = command_handler(&config)?;
            match handler.run_daily(&client).await? {
                Some(summary) if !summary.all_sent() => {
                    warn!("Daily digest sent {} of {} vacancies", summary.sent, summary.total)
                }
                Some(summary) => info!("Daily digest sent {} vacancies", summary.sent),
                None => info!("Daily digest: nothing to send"),
            }
        }

        CliCommand::Scrape => {
            let pipeline = scrape_pipeline(&config)?;
            let report = pipeline.run(&urls.load().await).await?;

            let json = serde_json::to_string_pretty(&report.new_postings)
                .context("Failed to serialize postings")?;
            println!("{}", json);
            eprintln!("\nTotal new design jobs: {}", report.new_postings.len());
            for failure in report.failures() {
                eprintln!("Failed: {}", failure.url());
            }
        }

        CliCommand::Urls { action } => match action {
            UrlsAction::List => {
                let list = urls.load().await;
                if list.is_empty() {
                    println!("No pages. Add one with: design-jobs urls add <url>");
                }
                for url in list {
                    println!("{}", url);
                }
            }
            UrlsAction::Add { url } => {
                let url = normalize_source_url(&url);
                match urls.add(&url).await? {
                    AddOutcome::Added { total } => println!("Added: {} ({} total)", url, total),
                    AddOutcome::AlreadyPresent => println!("Already monitored: {}", url),
                }
            }
            UrlsAction::Remove { url } => {
                let url = normalize_source_url(&url);
                match urls.remove(&url).await? {
                    RemoveOutcome::Removed { remaining } => {
                        println!("Removed: {} ({} remaining)", url, remaining)
                    }
                    RemoveOutcome::NotFound => println!("Not in the list: {}", url),
                }
            }
        },

        CliCommand::Letter {
            title,
            company,
            description,
        } => {
            let generator = YandexGptClient::new(config.llm.clone())?;
            let description = if description.is_empty() {
                title.clone()
            } else {
                description
            };
            let letter = generator.generate(&title, &description, &company).await?;
            println!("{}", letter);
        }
    }

    Ok(())
}

fn scrape_pipeline(config: &ConfigManager) -> Result<ScrapePipeline<HttpFetcher, JsonSeenStore>> {
    let fetcher = HttpFetcher::new(config.scrape.timeout_seconds)?;
    let seen = JsonSeenStore::new(config.environment.seen_jobs_path());
    Ok(ScrapePipeline::new(fetcher, seen))
}

fn command_handler(config: &ConfigManager) -> Result<CommandHandler<HttpFetcher, JsonSeenStore>> {
    let env = &config.environment;
    Ok(CommandHandler::new(
        scrape_pipeline(config)?,
        UrlStore::new(env.urls_path()),
        BotStateStore::new(env.bot_state_path()),
        Box::new(YandexGptClient::new(config.llm.clone())?),
        config.resume_pdf_url.clone(),
    ))
}
