use crate::entity::{AppError, SwapParams, SwapQuote, SwapResult};
use crate::raydium::{self, instruction::build_swap_instructions, PoolSnapshot};
use crate::solana::{self, ChainClient};
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use solana_sdk::signature::Signer;
use std::sync::Arc;

#[async_trait]
pub trait SwapInteractor: Send + Sync {
    /// Price a swap against current reserves without signing anything
    async fn quote(&self, params: &SwapParams) -> Result<SwapQuote>;
    async fn swap(&self, private_key: &str, params: &SwapParams) -> Result<SwapResult>;
}

pub struct SwapInteractorImpl {
    chain: Arc<dyn ChainClient>,
    explorer_tx_url: String,
}

impl SwapInteractorImpl {
    pub fn new(chain: Arc<dyn ChainClient>, explorer_tx_url: impl Into<String>) -> Self {
        Self {
            chain,
            explorer_tx_url: explorer_tx_url.into(),
        }
    }

    pub fn explorer_link(&self, signature: &str) -> String {
        format!("{}{}", self.explorer_tx_url, signature)
    }

    /// Checks that need no chain data. Runs before the pool is read.
    fn validate(params: &SwapParams) -> Result<()> {
        if !params.amount.is_finite() || params.amount <= 0.0 {
            return Err(AppError::InvalidAmount.into());
        }
        raydium::slippage_to_bps(params.slippage)?;
        Ok(())
    }

    async fn quote_pool(&self, params: &SwapParams) -> Result<(PoolSnapshot, SwapQuote)> {
        Self::validate(params)?;
        let pool_id = solana::parse_user_pubkey(&params.pool_id)?;

        let pool = raydium::load_pool(self.chain.as_ref(), &pool_id).await?;
        let quote = pool.quote(params.action, params.amount, params.slippage)?;
        Ok((pool, quote))
    }
}

#[async_trait]
impl SwapInteractor for SwapInteractorImpl {
    async fn quote(&self, params: &SwapParams) -> Result<SwapQuote> {
        let (_, quote) = self.quote_pool(params).await?;
        Ok(quote)
    }

    async fn swap(&self, private_key: &str, params: &SwapParams) -> Result<SwapResult> {
        Self::validate(params)?;
        let keypair = solana::keypair_from_base58(private_key)?;
        let (pool, quote) = self.quote_pool(params).await?;

        let payer = keypair.pubkey();
        let instructions = build_swap_instructions(&payer, &pool, params.action, &quote)?;
        let signature = self.chain.send_instructions(&keypair, &instructions).await?;

        info!(
            "Swap {} on pool {}: {} in, at least {} out. Signature: {}",
            params.action, params.pool_id, quote.amount_in, quote.min_amount_out, signature
        );

        Ok(SwapResult {
            explorer: self.explorer_link(&signature),
            signature,
            quote,
        })
    }
}
