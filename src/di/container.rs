use anyhow::Result;
use std::sync::Arc;

use crate::auth::{JwtKeys, UserStore};
use crate::catalog::TokenCatalog;
use crate::config::Settings;
use crate::demo::DemoStore;
use crate::interactor::{
    AuthInteractor, AuthInteractorImpl, DemoInteractor, DemoInteractorImpl, PriceInteractor,
    PriceInteractorImpl, SendInteractor, SendInteractorImpl, SwapInteractor, SwapInteractorImpl,
    WalletInteractor, WalletInteractorImpl,
};
use crate::solana::ChainClient;

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Core services
    catalog: Arc<TokenCatalog>,
    cookie_secure: bool,

    // Interactors
    wallet_interactor: Arc<dyn WalletInteractor>,
    send_interactor: Arc<dyn SendInteractor>,
    swap_interactor: Arc<dyn SwapInteractor>,
    price_interactor: Arc<dyn PriceInteractor>,
    auth_interactor: Arc<dyn AuthInteractor>,
    demo_interactor: Arc<dyn DemoInteractor>,
}

impl ServiceContainer {
    /// Wire every interactor around one chain client. Loads the saved demo state.
    pub async fn new(settings: &Settings, chain: Arc<dyn ChainClient>) -> Result<Self> {
        let catalog = Arc::new(TokenCatalog::builtin()?);

        let jwt = JwtKeys::new(&settings.jwt_secret, settings.jwt_ttl_secs)?;
        let auth_interactor = Arc::new(AuthInteractorImpl::new(
            UserStore::new(&settings.users_file),
            jwt,
            settings.totp_issuer.clone(),
        ));

        let demo_interactor = Arc::new(
            DemoInteractorImpl::load(DemoStore::new(&settings.demo_state_file), catalog.clone())
                .await?,
        );

        Ok(Self {
            wallet_interactor: Arc::new(WalletInteractorImpl::new(chain.clone())),
            send_interactor: Arc::new(SendInteractorImpl::new(chain.clone())),
            swap_interactor: Arc::new(SwapInteractorImpl::new(
                chain.clone(),
                settings.explorer_tx_url.clone(),
            )),
            price_interactor: Arc::new(PriceInteractorImpl::new(chain)),
            auth_interactor,
            demo_interactor,
            catalog,
            cookie_secure: settings.cookie_secure,
        })
    }

    // Accessor methods

    /// Whether cookies set by handlers carry `Secure`
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    pub fn catalog(&self) -> Arc<TokenCatalog> {
        self.catalog.clone()
    }

    pub fn wallet_interactor(&self) -> Arc<dyn WalletInteractor> {
        self.wallet_interactor.clone()
    }

    pub fn send_interactor(&self) -> Arc<dyn SendInteractor> {
        self.send_interactor.clone()
    }

    pub fn swap_interactor(&self) -> Arc<dyn SwapInteractor> {
        self.swap_interactor.clone()
    }

    pub fn price_interactor(&self) -> Arc<dyn PriceInteractor> {
        self.price_interactor.clone()
    }

    pub fn auth_interactor(&self) -> Arc<dyn AuthInteractor> {
        self.auth_interactor.clone()
    }

    pub fn demo_interactor(&self) -> Arc<dyn DemoInteractor> {
        self.demo_interactor.clone()
    }
}
