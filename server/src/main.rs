//! Exchange Server Binary
//!
//! Serves rate lookups and conversions backed by a single upstream quote
//! provider.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_fx::{ExchangeEngine, ExchangeEngineConfig, HttpQuoteProvider};
use exchange_server::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting exchange server");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let provider = Arc::new(HttpQuoteProvider::new(config.provider.clone())?);
    let engine = ExchangeEngine::new(
        provider,
        ExchangeEngineConfig {
            cache: config.cache.clone(),
        },
    );
    let app = create_router(AppState::new(engine));

    let addr = format!("{}:{}", config.listen_addr, config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        listen_addr = %config.listen_addr,
        listen_port = %config.listen_port,
        cache_ttl_secs = ?config.cache.ttl.map(|ttl| ttl.as_secs()),
        "Exchange server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Exchange server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
