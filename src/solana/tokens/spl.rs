use anyhow::{anyhow, Context, Result};
use log::debug;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};
use std::collections::HashMap;

use crate::entity::{AppError, WalletToken};
use crate::solana::client::ChainClient;
use crate::solana::tokens::account::{decode_mint_decimals, decode_token_account};
use crate::solana::utils::{known_token, shorten_address, to_raw_amount, ui_amount};

/// Programs whose accounts count as token holdings
pub fn token_program_ids() -> [Pubkey; 2] {
    [spl_token::id(), spl_token_2022::id()]
}

fn is_token_program(program_id: &Pubkey) -> bool {
    token_program_ids().contains(program_id)
}

/// Get token balances across the Token and Token-2022 programs
pub async fn get_token_balances(chain: &dyn ChainClient, owner: &Pubkey) -> Result<Vec<WalletToken>> {
    let mut holdings = Vec::new();

    for program_id in token_program_ids() {
        let accounts = chain.get_token_accounts_by_owner(owner, &program_id).await?;
        debug!(
            "Found {} token accounts for {} under {}",
            accounts.len(),
            owner,
            program_id
        );

        for account in accounts {
            let info = decode_token_account(&account.data)
                .with_context(|| format!("Failed to decode token account {}", account.address))?;
            holdings.push(info);
        }
    }

    // Decimals live on the mint; fetch each distinct mint once
    let mut mints: Vec<Pubkey> = holdings.iter().map(|h| h.mint).collect();
    mints.sort();
    mints.dedup();

    let mint_accounts = chain.get_multiple_accounts(&mints).await?;
    let mut decimals_by_mint = HashMap::new();
    for (mint, account) in mints.iter().zip(mint_accounts) {
        let account = account.ok_or_else(|| anyhow!("Mint account {} not found", mint))?;
        decimals_by_mint.insert(*mint, decode_mint_decimals(&account.data)?);
    }

    let balances = holdings
        .into_iter()
        .map(|holding| {
            let decimals = decimals_by_mint.get(&holding.mint).copied().unwrap_or_default();
            let mint = holding.mint.to_string();
            let (name, symbol) = match known_token(&holding.mint) {
                Some((name, symbol)) => (name.to_string(), symbol.to_string()),
                None => ("Unknown Token".to_string(), shorten_address(&mint)),
            };

            WalletToken {
                name,
                symbol,
                balance: ui_amount(holding.amount, decimals),
                mint,
                decimals,
            }
        })
        .collect();

    Ok(balances)
}

/// Build a checked transfer for whichever token program owns the mint
fn transfer_checked_instruction(
    token_program: &Pubkey,
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Instruction> {
    let instruction = if *token_program == spl_token::id() {
        spl_token::instruction::transfer_checked(
            token_program,
            source,
            mint,
            destination,
            authority,
            &[],
            amount,
            decimals,
        )
    } else {
        spl_token_2022::instruction::transfer_checked(
            token_program,
            source,
            mint,
            destination,
            authority,
            &[],
            amount,
            decimals,
        )
    };

    instruction.map_err(|e| anyhow!("Failed to create token transfer instruction: {}", e))
}

/// Send SPL token
pub async fn send_spl_token(
    chain: &dyn ChainClient,
    keypair: &Keypair,
    recipient: &Pubkey,
    mint: &Pubkey,
    amount: f64,
) -> Result<String> {
    let mint_account = chain
        .get_account(mint)
        .await?
        .ok_or_else(|| AppError::TokenNotFound(mint.to_string()))?;

    let token_program = mint_account.owner;
    if !is_token_program(&token_program) {
        return Err(AppError::InvalidAddress(format!("{} is not a token mint", mint)).into());
    }

    let decimals = decode_mint_decimals(&mint_account.data)?;
    let token_amount = to_raw_amount(amount, decimals)?;

    // Get sender's token account
    let sender_pubkey = keypair.pubkey();
    let sender_token_account =
        get_associated_token_address_with_program_id(&sender_pubkey, mint, &token_program);

    let sender_account = chain
        .get_account(&sender_token_account)
        .await?
        .ok_or_else(|| anyhow!("Sender doesn't have a token account for {}", mint))?;

    // Make sure sender has enough tokens
    if decode_token_account(&sender_account.data)?.amount < token_amount {
        return Err(AppError::InsufficientFunds.into());
    }

    let recipient_token_account =
        get_associated_token_address_with_program_id(recipient, mint, &token_program);

    let mut instructions = Vec::new();

    // Create the recipient's associated account when it is missing
    if chain.get_account(&recipient_token_account).await?.is_none() {
        instructions.push(create_associated_token_account_idempotent(
            &sender_pubkey,
            recipient,
            mint,
            &token_program,
        ));
    }

    instructions.push(transfer_checked_instruction(
        &token_program,
        &sender_token_account,
        mint,
        &recipient_token_account,
        &sender_pubkey,
        token_amount,
        decimals,
    )?);

    chain.send_instructions(keypair, &instructions).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solana::tokens::account::tests::{mint_bytes, token_account_bytes};
    use crate::solana::InMemoryChain;

    /// Token-2022 mint with 6 decimals; `owner`'s ATA holds 5.0
    fn token_2022_wallet(chain: &InMemoryChain, owner: &Pubkey) -> (Pubkey, Pubkey) {
        let program = spl_token_2022::id();
        let mint = Pubkey::new_unique();
        chain.set_account(mint, program, mint_bytes(6));

        let ata = get_associated_token_address_with_program_id(owner, &mint, &program);
        chain.set_account(ata, program, token_account_bytes(&mint, owner, 5_000_000));
        (mint, ata)
    }

    #[tokio::test]
    async fn token_2022_balances_are_listed() {
        let chain = InMemoryChain::new();
        let owner = Pubkey::new_unique();
        let (mint, _) = token_2022_wallet(&chain, &owner);

        let balances = get_token_balances(&chain, &owner).await.unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].mint, mint.to_string());
        assert_eq!(balances[0].decimals, 6);
        assert_eq!(balances[0].balance, 5.0);
        assert_eq!(balances[0].name, "Unknown Token");
    }

    #[tokio::test]
    async fn send_creates_missing_recipient_account() {
        let chain = InMemoryChain::new();
        let sender = Keypair::new();
        let recipient = Pubkey::new_unique();
        let (mint, sender_ata) = token_2022_wallet(&chain, &sender.pubkey());

        send_spl_token(&chain, &sender, &recipient, &mint, 2.0)
            .await
            .unwrap();

        let sent = chain.sent_transactions();
        assert_eq!(sent.len(), 1);
        let instructions = &sent[0];
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].program_id, spl_associated_token_account::id());
        assert_eq!(instructions[1].program_id, spl_token_2022::id());

        let recipient_ata =
            get_associated_token_address_with_program_id(&recipient, &mint, &spl_token_2022::id());
        let accounts: Vec<Pubkey> = instructions[1].accounts.iter().map(|a| a.pubkey).collect();
        assert_eq!(accounts[..3], [sender_ata, mint, recipient_ata]);

        let expected = spl_token_2022::instruction::transfer_checked(
            &spl_token_2022::id(),
            &sender_ata,
            &mint,
            &recipient_ata,
            &sender.pubkey(),
            &[],
            2_000_000,
            6,
        )
        .unwrap();
        assert_eq!(instructions[1].data, expected.data);
    }

    #[tokio::test]
    async fn existing_recipient_account_is_reused() {
        let chain = InMemoryChain::new();
        let sender = Keypair::new();
        let recipient = Pubkey::new_unique();
        let (mint, _) = token_2022_wallet(&chain, &sender.pubkey());
        let recipient_ata =
            get_associated_token_address_with_program_id(&recipient, &mint, &spl_token_2022::id());
        chain.set_account(
            recipient_ata,
            spl_token_2022::id(),
            token_account_bytes(&mint, &recipient, 0),
        );

        send_spl_token(&chain, &sender, &recipient, &mint, 5.0)
            .await
            .unwrap();

        let sent = chain.sent_transactions();
        assert_eq!(sent[0].len(), 1);
        assert_eq!(sent[0][0].program_id, spl_token_2022::id());
    }

    #[tokio::test]
    async fn overdraft_is_insufficient_funds() {
        let chain = InMemoryChain::new();
        let sender = Keypair::new();
        let (mint, _) = token_2022_wallet(&chain, &sender.pubkey());

        let err = send_spl_token(&chain, &sender, &Pubkey::new_unique(), &mint, 6.0)
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::InsufficientFunds)
        ));
        assert!(chain.sent_transactions().is_empty());
    }

    #[tokio::test]
    async fn non_token_mint_is_rejected() {
        let chain = InMemoryChain::new();
        let sender = Keypair::new();
        let mint = Pubkey::new_unique();
        chain.set_account(mint, Pubkey::new_unique(), mint_bytes(6));

        let err = send_spl_token(&chain, &sender, &Pubkey::new_unique(), &mint, 1.0)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AppError>(),
            Some(AppError::InvalidAddress(_))
        ));
    }
}
