pub mod cli;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod generate;
pub mod service;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Command};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::db::SqliteRepository;
use crate::service::StudyService;

pub use crate::error::{Result, StudyError};
pub use crate::service::{DeckSummary, RateOutcome};

/// Parse arguments, load configuration, open the database and run a command.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.database_path.display(), "opening database");
    let repo = SqliteRepository::open(&config.database_path)?;
    let service = StudyService::with_config(repo, SystemClock, &config)?;

    match cli.command.unwrap_or(Command::Decks) {
        Command::Decks => {
            println!("Study day {}", service.today());
            cli::print_summaries(&service.deck_summaries()?, std::io::stdout().lock())?;
        }
        Command::Study { deck_id } => {
            cli::study(&service, &deck_id, std::io::stdin().lock(), std::io::stdout())?;
        }
    }
    Ok(())
}
