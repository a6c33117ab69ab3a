// src/main.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::process;
use std::time::Duration;
use tracing::{error, info};

mod auctions;
mod config;
mod logging;
mod search;
mod sync;
#[cfg(test)]
mod test_utils;

use crate::auctions::{AuctionApiClient, RetryPolicy, RetryingClient};
use crate::search::{MeiliSearchStore, SearchStore};
use crate::sync::Bootstrapper;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.toml",
        global = true
    )]
    config: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch all auctions and build the search index
    Run,
    /// Fetch only auctions updated since the newest indexed document
    Refresh {
        /// Override the lower bound (RFC3339 format)
        #[arg(long)]
        since: Option<String>,
    },
    /// Query the search index
    Search {
        /// Text to search for
        term: String,

        /// Maximum number of results to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Remove all documents from the search index
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match config::load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from {}: {}", cli.config, e);
            process::exit(1);
        }
    };

    let _log_guard = match logging::init_logging(config.logging.as_ref(), cli.verbose) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Auction Search Synchronizer v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from: {}", cli.config);

    let result = match cli.command {
        Commands::Run => run_bootstrap(config).await,
        Commands::Refresh { since } => run_refresh(config, since).await,
        Commands::Search { term, limit } => run_search(config, term, limit).await,
        Commands::Reset => run_reset(config).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}

/// Run the full startup synchronization
async fn run_bootstrap(config: config::Config) -> Result<()> {
    let bootstrapper = initialize_bootstrapper(&config).await?;

    let report = bootstrapper.run().await?;
    info!(
        "Bootstrap finished: {} documents were already indexed, {} auctions fetched, {} documents written",
        report.existing_documents, report.fetched_records, report.indexed_documents
    );

    Ok(())
}

/// Run an incremental refresh
async fn run_refresh(config: config::Config, since: Option<String>) -> Result<()> {
    let since_time = if let Some(ts) = since {
        Some(
            DateTime::parse_from_rfc3339(&ts)
                .context(format!("Failed to parse timestamp: {}", ts))?
                .with_timezone(&Utc),
        )
    } else {
        None
    };

    let bootstrapper = initialize_bootstrapper(&config).await?;

    let report = bootstrapper.refresh(since_time).await?;
    info!(
        "Refresh finished: {} auctions fetched, {} documents written",
        report.fetched_records, report.indexed_documents
    );

    Ok(())
}

/// Query the search index and print matching auctions
async fn run_search(config: config::Config, term: String, limit: usize) -> Result<()> {
    let store = MeiliSearchStore::new(&config.search)
        .await
        .context("Failed to connect to the search store")?;

    let documents = store
        .search(&term, limit)
        .await
        .context("Search query failed")?;
    info!("{} documents matched \"{}\"", documents.len(), term);

    for doc in documents {
        println!(
            "{}  {} {} {} ({}, {} mi) seller {}",
            doc.id, doc.year, doc.make, doc.model, doc.color, doc.mileage, doc.seller
        );
    }

    Ok(())
}

/// Clear the search index
async fn run_reset(config: config::Config) -> Result<()> {
    let store = MeiliSearchStore::new(&config.search)
        .await
        .context("Failed to connect to the search store")?;

    info!("Clearing the search index...");

    store
        .clear_documents()
        .await
        .context("Failed to clear the search index")?;

    info!("Search index has been cleared successfully");

    Ok(())
}

async fn initialize_bootstrapper(
    config: &config::Config,
) -> Result<Bootstrapper<RetryingClient<AuctionApiClient>, MeiliSearchStore>, anyhow::Error> {
    let client = AuctionApiClient::new(&config.auction)
        .context("Failed to initialize the auction API client")?;

    let interval = Duration::from_secs(config.sync.retry_interval_seconds);
    let policy = match config.sync.max_attempts {
        0 => RetryPolicy::fixed(interval),
        n => RetryPolicy::bounded(interval, n),
    };
    let source = RetryingClient::new(client, policy);

    let store = MeiliSearchStore::new(&config.search)
        .await
        .context("Failed to connect to the search store")?;

    let bootstrapper = Bootstrapper::new(source, store);

    info!("Bootstrapper initialized successfully");

    Ok(bootstrapper)
}
