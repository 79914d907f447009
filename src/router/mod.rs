use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::handlers::{self, AppState};

/// Builds the HTTP route table around shared services
pub struct ApiRouter {
    services: AppState,
    cors_origins: Vec<HeaderValue>,
}

impl ApiRouter {
    /// Only `cors_origins` may call from a browser, and they may send cookies
    pub fn new(services: AppState, cors_origins: &[&str]) -> Result<Self> {
        let cors_origins = cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            services,
            cors_origins,
        })
    }

    pub fn build(self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.cors_origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true);

        Router::new()
            .merge(Self::wallet_routes())
            .merge(Self::swap_routes())
            .merge(Self::auth_routes())
            .merge(Self::catalog_routes())
            .merge(Self::demo_routes())
            .route("/health", get(handlers::health::health))
            .layer(cors)
            .with_state(self.services)
    }

    fn wallet_routes() -> Router<AppState> {
        Router::new()
            .route("/wallet-info", post(handlers::wallet::wallet_info))
            .route("/send-token", post(handlers::transfer::send_token))
    }

    fn swap_routes() -> Router<AppState> {
        Router::new()
            .route("/swap", post(handlers::swap::swap))
            .route("/swap/quote", post(handlers::swap::quote))
            .route("/token-price/:pool_id", get(handlers::swap::token_price))
    }

    fn auth_routes() -> Router<AppState> {
        Router::new()
            .route("/api/register", post(handlers::auth::register))
            .route("/api/login", post(handlers::auth::login))
            .route("/api/me", get(handlers::auth::me))
    }

    fn catalog_routes() -> Router<AppState> {
        Router::new()
            .route("/tokens", get(handlers::catalog::list_tokens))
            .route("/tokens/:id", get(handlers::catalog::get_token))
            .route("/sectors", get(handlers::catalog::list_sectors))
    }

    fn demo_routes() -> Router<AppState> {
        Router::new()
            .route("/demo", get(handlers::demo::state))
            .route("/demo/enter", post(handlers::demo::enter))
            .route("/demo/exit", post(handlers::demo::exit))
            .route("/demo/buy", post(handlers::demo::buy))
            .route("/demo/sell", post(handlers::demo::sell))
            .route("/demo/send", post(handlers::demo::send))
    }
}
