//! leakdb-client - desktop client for the leak ingestion backend
//!
//! Uploads leak files, searches ingested records and shows the ingestion worker's status.

mod api;
mod app;
mod commands;
mod config;
mod error;
mod results;
mod search;
mod status;
mod theme;
mod upload;
mod utils;

use anyhow::Result;
use api::{Backend, HttpBackend};
use app::LeakDbApp;
use clap::{Parser, Subcommand};
use config::Config;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "leakdb-client")]
#[command(version, about = "Desktop client for the leak ingestion backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend origin, overrides backend.base_url
    #[arg(long)]
    backend: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is up
    Health,
    /// Print the ingestion worker's status
    Status,
    /// Search ingested records
    Search {
        /// Free-text query
        query: String,
    },
    /// Upload a leak file
    Upload {
        /// File to upload
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.backend {
        config.backend.base_url = base_url;
    }
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let http = HttpBackend::new(&config.backend)?;
    let base_url = http.base_url().clone();
    let backend: Arc<dyn Backend> = Arc::new(http);

    match cli.command {
        Some(Commands::Health) => runtime.block_on(commands::health(backend.as_ref())),
        Some(Commands::Status) => runtime.block_on(commands::status(backend.as_ref())),
        Some(Commands::Search { query }) => {
            runtime.block_on(commands::search(backend.as_ref(), &query))
        }
        Some(Commands::Upload { file }) => {
            runtime.block_on(commands::upload(backend.as_ref(), &base_url, &file))
        }
        None => run_gui(config, base_url, backend, runtime.handle().clone()),
    }
}

fn run_gui(
    config: Config,
    base_url: reqwest::Url,
    backend: Arc<dyn Backend>,
    runtime: tokio::runtime::Handle,
) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([600.0, 500.0])
            .with_title("LeakDB"),
        ..Default::default()
    };

    eframe::run_native(
        "LeakDB",
        options,
        Box::new(move |cc| Box::new(LeakDbApp::new(cc, &config, base_url, backend, runtime))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the UI: {}", e))
}
