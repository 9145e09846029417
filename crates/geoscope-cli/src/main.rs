//! Geoscope CLI Application
//!
//! Terminal front end for the GEO visibility analysis service.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use geoscope_core::{AnalysisSession, ApiConfig, ArchiveBuilder, HttpAnalysisClient};
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        api_url,
        origin,
        database_file,
        no_color,
        command,
    } = Args::parse();

    let config = ApiConfig::from_env(api_url.as_deref(), origin.as_deref())
        .context("Failed to resolve the analysis service URL")?;
    info!("Geoscope started in {} mode", config.mode);

    let archive = ArchiveBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize the local archive")?;

    let session = AnalysisSession::new(HttpAnalysisClient::new(config)).with_archive(archive.clone());
    let cli = Cli::new(session, archive, TerminalRenderer::new(!no_color));

    match command {
        Some(Analyze(args)) => cli.analyze(args).await,
        Some(Compare(args)) => cli.compare(args).await,
        Some(History(args)) => cli.history(args).await,
        Some(Show(args)) => cli.show(args).await,
        Some(ClearHistory(args)) => cli.clear_history(args).await,
        Some(Status) | None => cli.status().await,
        Some(Examples) => cli.examples(),
    }
}
