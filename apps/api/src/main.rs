mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod state;
mod webhook;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::analyzer::LetterAnalyzer;
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::webhook::WebhookNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting OfferScan API v{}", env!("CARGO_PKG_VERSION"));

    // Uploads are staged here during extraction
    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!(
            "Failed to create upload folder {}",
            config.upload_dir.display()
        )
    })?;

    // Initialize LLM client
    let gemini = GeminiClient::new(&config)?;
    info!("LLM client initialized (model: {})", gemini.model());
    let analyzer = LetterAnalyzer::new(Arc::new(gemini));

    let webhook = match &config.webhook_url {
        Some(url) => {
            info!("Forwarding analyses to webhook");
            Some(WebhookNotifier::new(url.clone())?)
        }
        None => None,
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        extractor: TextExtractor::new(),
        analyzer,
        webhook,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
