use anyhow::Result;
use async_trait::async_trait;
use log::info;
use solana_sdk::{
    account::Account,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::solana::client::{ChainClient, RawTokenAccount};
use crate::solana::tokens::account::decode_token_account;
use crate::solana::tokens::constants::TOKEN_ACCOUNT_MIN_LEN;

#[derive(Default)]
struct Ledger {
    balances: HashMap<Pubkey, u64>,
    accounts: HashMap<Pubkey, Account>,
    sent: Vec<Vec<Instruction>>,
    reads: usize,
}

/// Dry-run ledger: serves seeded accounts and records transactions instead of
/// submitting them.
#[derive(Default)]
pub struct InMemoryChain {
    ledger: Mutex<Ledger>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_balance(&self, address: Pubkey, lamports: u64) {
        self.ledger().balances.insert(address, lamports);
    }

    pub fn set_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        let account = Account {
            lamports: 2_039_280,
            data,
            owner,
            executable: false,
            rent_epoch: 0,
        };
        self.ledger().accounts.insert(address, account);
    }

    /// Instruction batches passed to `send_instructions`, oldest first
    pub fn sent_transactions(&self) -> Vec<Vec<Instruction>> {
        self.ledger().sent.clone()
    }

    /// Number of read calls served so far
    pub fn read_count(&self) -> usize {
        self.ledger().reads
    }
}

#[async_trait]
impl ChainClient for InMemoryChain {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        let mut ledger = self.ledger();
        ledger.reads += 1;
        Ok(ledger.balances.get(address).copied().unwrap_or(0))
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let mut ledger = self.ledger();
        ledger.reads += 1;
        Ok(ledger.accounts.get(address).cloned())
    }

    async fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> Result<Vec<Option<Account>>> {
        let mut ledger = self.ledger();
        ledger.reads += 1;
        Ok(addresses
            .iter()
            .map(|address| ledger.accounts.get(address).cloned())
            .collect())
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<RawTokenAccount>> {
        let mut ledger = self.ledger();
        ledger.reads += 1;

        let mut accounts: Vec<RawTokenAccount> = ledger
            .accounts
            .iter()
            .filter(|(_, account)| {
                account.owner == *program_id && account.data.len() >= TOKEN_ACCOUNT_MIN_LEN
            })
            .filter(|(_, account)| {
                decode_token_account(&account.data)
                    .map(|info| info.owner == *owner)
                    .unwrap_or(false)
            })
            .map(|(address, account)| RawTokenAccount {
                address: *address,
                data: account.data.clone(),
            })
            .collect();
        accounts.sort_by_key(|account| account.address);

        Ok(accounts)
    }

    async fn send_instructions(
        &self,
        payer: &Keypair,
        instructions: &[Instruction],
    ) -> Result<String> {
        self.ledger().sent.push(instructions.to_vec());

        let signature = Signature::new_unique();
        info!(
            "[DRY RUN] {} instruction(s) from {} recorded as {}",
            instructions.len(),
            payer.pubkey(),
            signature
        );

        Ok(signature.to_string())
    }
}
