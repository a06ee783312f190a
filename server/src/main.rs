//! Scrapbook API server.
//!
//! Usage:
//!   SCRAPBOOK_TOKEN_PUBLIC_KEY=<base64url key> scrapbook-server --port 4100

use anyhow::{Context, Result};
use clap::Parser;
use scrapbook_server::config::Args;
use scrapbook_server::{AppState, build_router};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    info!("Scrapbook server starting...");

    let db = args
        .open_database()
        .with_context(|| format!("opening database {}", args.database.display()))?;
    let verifier = args.verifier().context("loading token public key")?;
    let state = AppState::new(db, Arc::new(verifier));

    let addr = args.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("HTTP API listening on {}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Scrapbook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
    }
}
