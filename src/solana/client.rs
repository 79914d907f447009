use anyhow::{anyhow, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use serde_json::json;
use solana_account_decoder::{UiAccountData, UiAccountEncoding};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::RpcRequest;
use solana_client::rpc_response::{Response, RpcKeyedAccount};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::sync::Arc;

use crate::entity::AppError;
use crate::solana::wallet::parse_pubkey;

// getMultipleAccounts accepts at most 100 keys per call
const MAX_MULTIPLE_ACCOUNTS: usize = 100;

/// Create a Solana client with confirmed commitment
pub fn create_solana_client(rpc_url: &str) -> Arc<RpcClient> {
    let client = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());

    Arc::new(client)
}

/// A token account as stored on chain, undecoded.
#[derive(Debug, Clone)]
pub struct RawTokenAccount {
    pub address: Pubkey,
    pub data: Vec<u8>,
}

/// The chain operations the services need.
///
/// Everything above this trait works on raw accounts and instructions, so the
/// RPC node can be replaced by an in-memory ledger in tests.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native balance in lamports
    async fn get_balance(&self, address: &Pubkey) -> Result<u64>;

    /// Account at `address`, or `None` when it does not exist
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    /// Accounts in the same order as `addresses`
    async fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> Result<Vec<Option<Account>>>;

    /// Raw token accounts owned by `owner` under the given token program
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<RawTokenAccount>>;

    /// Sign with `payer`, submit and wait for confirmation. Returns the signature.
    async fn send_instructions(&self, payer: &Keypair, instructions: &[Instruction])
        -> Result<String>;
}

/// `ChainClient` backed by a JSON-RPC node.
pub struct RpcChainClient {
    client: Arc<RpcClient>,
}

impl RpcChainClient {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        let lamports = self
            .client
            .get_balance(address)
            .await
            .map_err(|e| AppError::SolanaClient(format!("Failed to get balance: {}", e)))?;

        Ok(lamports)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(|e| AppError::SolanaClient(format!("Failed to get account {}: {}", address, e)))?;

        Ok(response.value)
    }

    async fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        let mut accounts = Vec::with_capacity(addresses.len());

        for chunk in addresses.chunks(MAX_MULTIPLE_ACCOUNTS) {
            let batch = self
                .client
                .get_multiple_accounts(chunk)
                .await
                .map_err(|e| AppError::SolanaClient(format!("Failed to get accounts: {}", e)))?;
            accounts.extend(batch);
        }

        Ok(accounts)
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<RawTokenAccount>> {
        // The typed client call forces jsonParsed; ask for the raw buffers instead
        let params = json!([
            owner.to_string(),
            { "programId": program_id.to_string() },
            {
                "encoding": UiAccountEncoding::Base64,
                "commitment": self.client.commitment().commitment,
            },
        ]);

        let response: Response<Vec<RpcKeyedAccount>> = self
            .client
            .send(RpcRequest::GetTokenAccountsByOwner, params)
            .await
            .map_err(|e| AppError::SolanaClient(format!("Failed to get token accounts: {}", e)))?;

        response
            .value
            .into_iter()
            .map(|keyed_account| {
                let address = parse_pubkey(&keyed_account.pubkey)?;
                let data = match keyed_account.account.data {
                    UiAccountData::Binary(blob, UiAccountEncoding::Base64) => STANDARD
                        .decode(blob)
                        .map_err(|e| anyhow!("Invalid base64 in account {}: {}", address, e))?,
                    other => {
                        return Err(anyhow!(
                            "Unexpected encoding for account {}: {:?}",
                            address,
                            other
                        ))
                    }
                };
                Ok(RawTokenAccount { address, data })
            })
            .collect()
    }

    async fn send_instructions(
        &self,
        payer: &Keypair,
        instructions: &[Instruction],
    ) -> Result<String> {
        let blockhash = self
            .client
            .get_latest_blockhash()
            .await
            .map_err(|e| AppError::SolanaClient(format!("Failed to get recent blockhash: {}", e)))?;

        let transaction =
            Transaction::new_signed_with_payer(instructions, Some(&payer.pubkey()), &[payer], blockhash);

        let signature = self
            .client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(|e| AppError::SolanaClient(format!("Failed to send transaction: {}", e)))?;
        debug!("Confirmed {} with {} instruction(s)", signature, instructions.len());

        Ok(signature.to_string())
    }
}
