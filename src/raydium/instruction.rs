use anyhow::{anyhow, Result};
use borsh::BorshSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
#[allow(deprecated)]
use solana_sdk::system_instruction::transfer as system_transfer;
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account_idempotent,
};

use crate::entity::{SwapAction, SwapQuote};
use crate::raydium::pool::{PoolSnapshot, SwapLeg};
use crate::raydium::{anchor_discriminator, pool_authority, CPMM_PROGRAM_ID};

#[derive(BorshSerialize)]
struct SwapBaseInputArgs {
    amount_in: u64,
    minimum_amount_out: u64,
}

/// `swap_base_input` against a CPMM pool
pub fn swap_base_input_instruction(
    payer: &Pubkey,
    pool: &PoolSnapshot,
    input: &SwapLeg,
    output: &SwapLeg,
    input_token_account: &Pubkey,
    output_token_account: &Pubkey,
    amount_in: u64,
    minimum_amount_out: u64,
) -> Result<Instruction> {
    let mut data = anchor_discriminator("global", "swap_base_input").to_vec();
    let args = SwapBaseInputArgs {
        amount_in,
        minimum_amount_out,
    };
    data.extend(borsh::to_vec(&args).map_err(|e| anyhow!("Failed to encode swap args: {}", e))?);

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(pool_authority(), false),
        AccountMeta::new_readonly(pool.state.amm_config, false),
        AccountMeta::new(pool.pool_id, false),
        AccountMeta::new(*input_token_account, false),
        AccountMeta::new(*output_token_account, false),
        AccountMeta::new(input.vault, false),
        AccountMeta::new(output.vault, false),
        AccountMeta::new_readonly(input.program, false),
        AccountMeta::new_readonly(output.program, false),
        AccountMeta::new_readonly(input.mint, false),
        AccountMeta::new_readonly(output.mint, false),
        AccountMeta::new(pool.state.observation_key, false),
    ];

    Ok(Instruction {
        program_id: CPMM_PROGRAM_ID,
        accounts,
        data,
    })
}

/// Full instruction list for a SOL-paired swap.
///
/// SOL moves through a temporary wrapped-SOL account that is closed at the end,
/// so the payer only ever holds native SOL.
pub fn build_swap_instructions(
    payer: &Pubkey,
    pool: &PoolSnapshot,
    action: SwapAction,
    quote: &SwapQuote,
) -> Result<Vec<Instruction>> {
    let (input, output) = pool.route(action)?;
    let token_program = spl_token::id();
    let wsol_account =
        get_associated_token_address_with_program_id(payer, &spl_token::native_mint::id(), &token_program);

    let input_account = get_associated_token_address_with_program_id(payer, &input.mint, &input.program);
    let output_account =
        get_associated_token_address_with_program_id(payer, &output.mint, &output.program);

    let mut instructions = vec![create_associated_token_account_idempotent(
        payer,
        payer,
        &spl_token::native_mint::id(),
        &token_program,
    )];

    match action {
        SwapAction::Buy => {
            instructions.push(system_transfer(payer, &wsol_account, quote.amount_in));
            instructions.push(spl_token::instruction::sync_native(&token_program, &wsol_account)?);
            instructions.push(create_associated_token_account_idempotent(
                payer,
                payer,
                &output.mint,
                &output.program,
            ));
        }
        SwapAction::Sell => {}
    }

    instructions.push(swap_base_input_instruction(
        payer,
        pool,
        &input,
        &output,
        &input_account,
        &output_account,
        quote.amount_in,
        quote.min_amount_out,
    )?);

    // Unwrap whatever SOL is left in (or was received into) the temporary account
    instructions.push(spl_token::instruction::close_account(
        &token_program,
        &wsol_account,
        payer,
        payer,
        &[],
    )?);

    Ok(instructions)
}
