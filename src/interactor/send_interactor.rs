use crate::entity::{AppError, TransferRequest};
use crate::solana::{self, ChainClient};
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use solana_sdk::signature::Signer;
use std::sync::Arc;

#[async_trait]
pub trait SendInteractor: Send + Sync {
    /// Sign and submit a transfer; returns the transaction signature
    async fn send_token(&self, request: &TransferRequest) -> Result<String>;
}

pub struct SendInteractorImpl {
    chain: Arc<dyn ChainClient>,
}

impl SendInteractorImpl {
    pub fn new(chain: Arc<dyn ChainClient>) -> Self {
        Self { chain }
    }
}

#[async_trait]
impl SendInteractor for SendInteractorImpl {
    async fn send_token(&self, request: &TransferRequest) -> Result<String> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(AppError::InvalidAmount.into());
        }

        let recipient = solana::parse_user_pubkey(&request.recipient)?;
        let mint = match (&request.mint, request.is_native_sol) {
            (_, true) => None,
            (Some(mint), false) if !mint.trim().is_empty() => Some(solana::parse_user_pubkey(mint)?),
            (_, false) => return Err(AppError::MissingFields("mint".to_string()).into()),
        };
        let keypair = solana::keypair_from_base58(&request.private_key)?;

        let signature = match mint {
            None => {
                solana::send_sol(self.chain.as_ref(), &keypair, &recipient, request.amount).await?
            }
            Some(mint) => {
                solana::send_spl_token(
                    self.chain.as_ref(),
                    &keypair,
                    &recipient,
                    &mint,
                    request.amount,
                )
                .await?
            }
        };

        info!(
            "Transfer of {} {} from {} to {} confirmed: {}",
            request.amount,
            request.mint.as_deref().filter(|_| !request.is_native_sol).unwrap_or("SOL"),
            keypair.pubkey(),
            recipient,
            signature
        );

        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solana::InMemoryChain;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signature::Keypair;

    fn request(keypair: &Keypair, amount: f64) -> TransferRequest {
        TransferRequest {
            private_key: solana::keypair_to_base58(keypair),
            recipient: Pubkey::new_unique().to_string(),
            amount,
            mint: None,
            is_native_sol: true,
        }
    }

    fn app_error(err: &anyhow::Error) -> &AppError {
        err.downcast_ref::<AppError>().unwrap()
    }

    #[tokio::test]
    async fn native_transfer_is_submitted() {
        let chain = Arc::new(InMemoryChain::new());
        let keypair = Keypair::new();
        chain.set_balance(keypair.pubkey(), 2_000_000_000);

        let interactor = SendInteractorImpl::new(chain.clone());
        interactor.send_token(&request(&keypair, 1.0)).await.unwrap();

        let sent = chain.sent_transactions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].len(), 1);
    }

    #[tokio::test]
    async fn rejects_non_positive_amounts_without_reading_chain() {
        let chain = Arc::new(InMemoryChain::new());
        let interactor = SendInteractorImpl::new(chain.clone());
        let keypair = Keypair::new();

        for amount in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let err = interactor.send_token(&request(&keypair, amount)).await.unwrap_err();
            assert!(matches!(app_error(&err), AppError::InvalidAmount));
        }
        assert_eq!(chain.read_count(), 0);
        assert!(chain.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn spl_transfer_requires_mint() {
        let interactor = SendInteractorImpl::new(Arc::new(InMemoryChain::new()));
        let mut req = request(&Keypair::new(), 1.0);
        req.is_native_sol = false;

        let err = interactor.send_token(&req).await.unwrap_err();
        assert!(matches!(app_error(&err), AppError::MissingFields(_)));
    }

    #[tokio::test]
    async fn insufficient_sol_is_reported() {
        let chain = Arc::new(InMemoryChain::new());
        let keypair = Keypair::new();
        chain.set_balance(keypair.pubkey(), 1_000_000_000);

        let interactor = SendInteractorImpl::new(chain.clone());
        let err = interactor.send_token(&request(&keypair, 1.0)).await.unwrap_err();

        assert!(matches!(app_error(&err), AppError::InsufficientFunds));
        assert!(chain.sent_transactions().is_empty());
    }
}
