use crate::entity::PoolPrice;
use crate::raydium;
use crate::solana::{self, ChainClient};
use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

#[async_trait]
pub trait PriceInteractor: Send + Sync {
    async fn get_pool_price(&self, pool_id: &str) -> Result<PoolPrice>;
}

pub struct PriceInteractorImpl {
    chain: Arc<dyn ChainClient>,
}

impl PriceInteractorImpl {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl PriceInteractor for PriceInteractorImpl {
    async fn get_pool_price(&self, pool_id: &str) -> Result<PoolPrice> {
        let pool_key = solana::parse_user_pubkey(pool_id)?;
        let pool = raydium::load_pool(self.chain.as_ref(), &pool_key).await?;
        let price_in_sol = pool.price_in_sol()?;

        debug!("Pool {} price: {} SOL", pool_id, price_in_sol);

        Ok(PoolPrice {
            pool_id: pool_key.to_string(),
            price_in_sol,
        })
    }
}
