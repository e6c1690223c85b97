//! # NewsHub Binary
//!
//! Operator CLI over a NewsHub data directory: inspect content, check that
//! every collection can be loaded, and materialise first-run data.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nh_config::{AppConfig, LogConfig, LogFormat};
use nh_core::{
    ArticleFilter, ArticleStatus, Id, OptionExt, PersistenceFailure, Store, SubscriberFilter,
};
use nh_db_json::JsonFileRepository;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "newshub", author, version, about, long_about = None)]
struct Cli {
    /// Data directory; overrides `data_dir` from the configuration
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write every collection to disk, seeding the ones never written.
    /// Files that exist but cannot be loaded are left alone and reported
    Init,
    /// Totals across all collections
    Stats,
    /// Distinct tags of published articles
    Tags {
        /// Show the N most used tags with their counts instead
        #[arg(long, value_name = "N")]
        popular: Option<usize>,
    },
    /// List articles, newest first
    Articles {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<ArticleStatus>,
        /// Only published articles carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show one article
    Article { id: Id },
    /// The ad currently served in a slot
    ActiveAd { space: String },
    /// Newsletter subscribers in sign-up order
    Subscribers {
        #[arg(long)]
        active: bool,
    },
    /// Report collections whose files could not be loaded; writes nothing
    Check,
}

fn init_tracing(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // stdout carries command output only
    match log.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow::anyhow!(e))
    .context("Failed to install tracing subscriber")
}

/// What `init` and `check` print: collections served from defaults because
/// their file could not be loaded, and collections whose last write failed.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthReport {
    load_failures: Vec<PersistenceFailure>,
    persistence_failures: Vec<PersistenceFailure>,
}

impl HealthReport {
    fn of(store: &Store) -> Self {
        Self {
            load_failures: store.load_failures(),
            persistence_failures: store.persistence_failures(),
        }
    }

    fn is_healthy(&self) -> bool {
        self.load_failures.is_empty() && self.persistence_failures.is_empty()
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log)?;

    let data_dir = cli.data_dir.unwrap_or(config.data_dir);
    let repo = JsonFileRepository::open(&data_dir)?;
    let mut store = Store::open(Box::new(repo));
    info!(data_dir = %data_dir.display(), "data directory opened");

    match cli.command {
        Command::Init => {
            store.flush_all();
            let report = HealthReport::of(&store);
            if !report.is_healthy() {
                print_json(&report)?;
                anyhow::bail!("some collections were not written; see report");
            }
            print_json(&store.get_stats())?;
        }
        Command::Stats => print_json(&store.get_stats())?,
        Command::Tags { popular: Some(limit) } => print_json(&store.get_popular_tags(limit))?,
        Command::Tags { popular: None } => print_json(&store.get_all_tags())?,
        Command::Articles { category, status, tag } => {
            let filter = ArticleFilter {
                category,
                status,
                ..Default::default()
            };
            let articles = match tag {
                Some(tag) => store
                    .get_articles_by_tag(&tag)
                    .into_iter()
                    .filter(|a| filter.matches(a))
                    .collect(),
                None => store.get_all_articles(&filter),
            };
            print_json(&articles)?;
        }
        Command::Article { id } => {
            let article = store.get_article_by_id(id).or_not_found("Article", id)?;
            print_json(&article)?;
        }
        Command::ActiveAd { space } => print_json(&store.get_active_ad_by_space(&space))?,
        Command::Subscribers { active } => {
            let filter = SubscriberFilter {
                active: active.then_some(true),
                ..Default::default()
            };
            print_json(&store.get_all_newsletter_subscribers(&filter))?;
        }
        Command::Check => {
            let report = HealthReport::of(&store);
            print_json(&report)?;
            if !report.is_healthy() {
                anyhow::bail!("{} collection(s) could not be loaded", report.load_failures.len());
            }
        }
    }

    Ok(())
}
