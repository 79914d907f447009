//! Token platform API server - Main executable
//!
//! Serves wallet balances, token transfers, Raydium CPMM swaps, user auth,
//! the token catalog and demo mode from one HTTP listener.
use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};
use std::sync::Arc;
use token_platform::solana::create_solana_client;
use token_platform::{ChainClient, InMemoryChain, RpcChainClient, Settings};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting token platform server v{}", token_platform::VERSION);

    let settings = Settings::load().context("Failed to load settings")?;

    let chain: Arc<dyn ChainClient> = if settings.dry_run {
        warn!("DRY_RUN is set: chain reads are empty and transactions are not submitted");
        Arc::new(InMemoryChain::new())
    } else {
        info!("Connecting to Solana network at {}", settings.solana_rpc_url);
        Arc::new(RpcChainClient::new(create_solana_client(&settings.solana_rpc_url)))
    };

    let app = token_platform::create_application(&settings, chain)
        .await
        .context("Failed to initialize application")?;

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    info!("Listening on {}. Press Ctrl+C to stop.", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
