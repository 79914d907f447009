use crate::entity::{WalletSnapshot, WalletToken};
use crate::solana::{self, ChainClient};
use crate::solana::tokens::constants::{SOL_DECIMALS, SOL_NAME, SOL_SYMBOL};
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use solana_sdk::signature::Signer;
use std::sync::Arc;

#[async_trait]
pub trait WalletInteractor: Send + Sync {
    async fn get_wallet_info(&self, private_key: &str) -> Result<WalletSnapshot>;
}

pub struct WalletInteractorImpl {
    chain: Arc<dyn ChainClient>,
}

impl WalletInteractorImpl {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl WalletInteractor for WalletInteractorImpl {
    async fn get_wallet_info(&self, private_key: &str) -> Result<WalletSnapshot> {
        let keypair = solana::keypair_from_base58(private_key)?;
        let owner = keypair.pubkey();

        let lamports = self.chain.get_balance(&owner).await?;
        let token_balances = solana::get_token_balances(self.chain.as_ref(), &owner).await?;

        let mut tokens = Vec::with_capacity(token_balances.len() + 1);
        tokens.push(WalletToken {
            name: SOL_NAME.to_string(),
            symbol: SOL_SYMBOL.to_string(),
            balance: solana::lamports_to_sol(lamports),
            mint: spl_token::native_mint::id().to_string(),
            decimals: SOL_DECIMALS,
        });
        tokens.extend(token_balances);

        info!("Read {} balances for wallet {}", tokens.len(), owner);

        Ok(WalletSnapshot {
            wallet_address: owner.to_string(),
            tokens,
        })
    }
}
