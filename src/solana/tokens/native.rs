use anyhow::Result;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
// Re-export moved to `solana-system-interface` in 2.2; the function itself is not deprecated
#[allow(deprecated)]
use solana_sdk::system_instruction::transfer as system_transfer;

use crate::entity::AppError;
use crate::solana::client::ChainClient;
use crate::solana::tokens::constants::{ESTIMATED_SOL_FEE, SOL_DECIMALS};
use crate::solana::utils::to_raw_amount;

/// Send SOL
pub async fn send_sol(
    chain: &dyn ChainClient,
    keypair: &Keypair,
    recipient: &Pubkey,
    amount: f64,
) -> Result<String> {
    let lamports = to_raw_amount(amount, SOL_DECIMALS)?;

    // Check sender balance
    let sender_pubkey = keypair.pubkey();
    let sender_balance = chain.get_balance(&sender_pubkey).await?;

    // Make sure sender has enough balance (including estimated fees)
    if sender_balance < lamports.saturating_add(ESTIMATED_SOL_FEE) {
        return Err(AppError::InsufficientFunds.into());
    }

    let instruction = system_transfer(&sender_pubkey, recipient, lamports);

    chain.send_instructions(keypair, &[instruction]).await
}
