pub mod auth;
pub mod catalog;
pub mod config;
pub mod demo;
pub mod di;
pub mod entity;
pub mod handlers;
pub mod interactor;
pub mod raydium;
pub mod router;
pub mod solana;

use anyhow::Result;
use std::sync::Arc;

// Re-export commonly used items
pub use config::Settings;
pub use di::ServiceContainer;
pub use entity::*;
pub use router::ApiRouter;
pub use solana::{ChainClient, InMemoryChain, RpcChainClient};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire services around `chain` and return the ready-to-serve router
pub async fn create_application(
    settings: &Settings,
    chain: Arc<dyn ChainClient>,
) -> Result<axum::Router> {
    let services = Arc::new(ServiceContainer::new(settings, chain).await?);
    Ok(ApiRouter::new(services, &settings.cors_origin_list())?.build())
}
