// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

mod api;
mod config;
mod db;
mod enrich;
mod error;
mod logging;
mod models;
mod query;
mod refresh;
mod state;
mod summary_image;
mod upstream;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(author, version, about = "Country and exchange-rate snapshot service", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging when RUST_LOG is not set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service (default)
    Serve,
    /// Run one refresh against the upstream APIs and exit
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = config::load_config(cli.config.as_deref())?;
    info!(
        database = %config.database_url,
        cache_dir = %config.cache_dir.display(),
        "Loaded configuration"
    );

    let pool = db::create_db_pool(&config.database_url).await?;
    info!("Database ready");
    let state = AppState::from_config(pool, &config);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(state, &config).await,
        Commands::Refresh => refresh_once(state).await,
    }
}

async fn serve(state: AppState, config: &config::Config) -> Result<()> {
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, "Server listening");

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn refresh_once(state: AppState) -> Result<()> {
    let outcome = refresh::refresh_countries(
        &state.pool,
        state.source.as_ref(),
        state.renderer.clone(),
        &state.image_path,
    )
    .await?;

    println!(
        "✅ Refreshed {} countries at {}",
        outcome.total_countries, outcome.last_refreshed_at
    );
    println!("📁 Summary image: {}", state.image_path.display());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
