use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use tubeshelf_api::{KeyPool, RetryingFetcher, VideoClient};
use tubeshelf_core::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_RESULTS, DEFAULT_REGION,
};
use tubeshelf_core::{Identity, env_list, env_parse_with_default};
use tubeshelf_storage::{FileStore, HistoryBackend, HistoryStore};

mod commands;

#[derive(Parser)]
#[command(name = "tubeshelf")]
#[command(about = "Browse trending videos, search and keep a watch history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the front end and the JSON API
    Serve {
        #[arg(short, long, default_value = "3000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// Directory holding index.html and the front-end assets
        #[arg(short, long, default_value = "public")]
        static_dir: PathBuf,
    },
    /// List trending videos
    Trending {
        #[arg(short, long)]
        region: Option<String>,
    },
    /// Search videos
    Search { query: String },
    /// Show view, like and comment counts for a video
    Stats { id: String },
    /// Show a channel's title and icon
    Channel { id: String },
    /// Record a video in the watch history
    Watch { id: String },
    /// Show or clear the watch history
    History {
        #[arg(short, long, default_value = "50")]
        limit: usize,
        #[arg(long)]
        clear: bool,
    },
}

pub(crate) fn get_api_keys() -> Vec<String> {
    let keys = env_list("TUBESHELF_API_KEYS");
    if keys.is_empty() {
        tracing::warn!("TUBESHELF_API_KEYS is empty, every video request will fail");
    }
    keys
}

pub(crate) fn get_base_url() -> String {
    std::env::var("TUBESHELF_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_owned())
}

pub(crate) fn get_region() -> String {
    std::env::var("TUBESHELF_REGION")
        .ok()
        .map(|r| r.trim().to_owned())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_owned())
}

pub(crate) fn get_data_dir() -> PathBuf {
    std::env::var_os("TUBESHELF_DATA_DIR").map(PathBuf::from).unwrap_or_else(|| {
        dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("tubeshelf")
    })
}

pub(crate) fn get_identity() -> Option<Identity> {
    std::env::var("TUBESHELF_USER")
        .ok()
        .map(|uid| uid.trim().to_owned())
        .filter(|uid| !uid.is_empty())
        .map(Identity::new)
}

pub(crate) fn ensure_data_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))
}

pub(crate) fn build_client() -> Result<VideoClient> {
    let pool = Arc::new(KeyPool::from_keys(get_api_keys()));
    let timeout = Duration::from_secs(env_parse_with_default(
        "TUBESHELF_HTTP_TIMEOUT_SECS",
        DEFAULT_HTTP_TIMEOUT_SECS,
    ));
    let fetcher = RetryingFetcher::new(pool, &get_base_url(), timeout)?;
    let max_results = env_parse_with_default("TUBESHELF_MAX_RESULTS", DEFAULT_MAX_RESULTS);
    Ok(VideoClient::new(fetcher).with_max_results(max_results))
}

pub(crate) fn open_history() -> Result<HistoryStore> {
    let data_dir = get_data_dir();
    ensure_data_dir(&data_dir)?;
    let identity = get_identity();
    let backend = HistoryBackend::select(identity.as_ref(), Arc::new(FileStore::new(data_dir)));
    tracing::debug!(backend = ?backend, "opening watch history");
    Ok(HistoryStore::load(backend)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, static_dir } => {
            commands::serve::run(port, host, static_dir).await?;
        },
        Commands::Trending { region } => {
            commands::browse::run_trending(region).await?;
        },
        Commands::Search { query } => {
            commands::browse::run_search(&query).await?;
        },
        Commands::Stats { id } => {
            commands::browse::run_stats(&id).await?;
        },
        Commands::Channel { id } => {
            commands::browse::run_channel(&id).await?;
        },
        Commands::Watch { id } => {
            commands::history::run_watch(&id).await?;
        },
        Commands::History { limit, clear } => {
            if clear {
                commands::history::run_clear()?;
            } else {
                commands::history::run_list(limit)?;
            }
        },
    }

    Ok(())
}
