// ABOUTME: FitPro server binary serving the plan, chat, and health endpoints
// ABOUTME: Loads the catalog, wires the oracle and embedder, and runs the axum server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPro Labs

//! # FitPro API Server Binary
//!
//! Starts the workout planning backend: loads the exercise catalog once,
//! initializes the Groq oracle and Hugging Face embedder from the
//! environment, and serves the REST API.

use anyhow::{Context, Result};
use clap::Parser;
use fitpro_server::{
    config::ServerConfig,
    corpus::ExerciseCorpus,
    embedding::{Embedder, HuggingFaceEmbedder},
    llm::{GroqProvider, LlmProvider},
    logging,
    resources::ServerResources,
    routes,
};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fitpro-server")]
#[command(about = "FitPro API - AI-assisted workout plan backend")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override exercise catalog path
    #[arg(long)]
    catalog: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(catalog) = args.catalog {
        config.catalog_path = catalog.into();
    }

    info!("Starting FitPro API server");

    let corpus = ExerciseCorpus::load(&config.catalog_path)
        .context("Failed to load the exercise catalog")?;
    if corpus.embedded_count() == 0 {
        warn!("No catalog record carries an embedding; retrieval will return nothing. Run seed-embeddings first.");
    }

    let provider: Arc<dyn LlmProvider> = Arc::new(GroqProvider::from_env()?);
    info!(
        provider = provider.name(),
        model = provider.default_model(),
        system_messages = provider.capabilities().supports_system_messages(),
        "oracle provider initialized"
    );

    let embedder = Arc::new(HuggingFaceEmbedder::from_env()?);
    info!(model = embedder.model(), "embedding provider initialized");

    let resources = Arc::new(ServerResources::new(config, corpus, provider, embedder));

    match resources.oracle.health_check().await {
        Ok(true) => info!("oracle health check passed"),
        Ok(false) => warn!("oracle health check failed; plan requests may error"),
        Err(e) => warn!("oracle health check unreachable: {e}"),
    }

    let port = resources.config.http_port;
    let app = routes::router(resources);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Cannot bind HTTP port {port}"))?;
    info!(port, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to install ctrl-c handler: {e}");
        return;
    }
    info!("shutdown signal received");
}
