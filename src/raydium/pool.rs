use anyhow::{anyhow, Context, Result};
use log::debug;
use solana_sdk::pubkey::Pubkey;

use crate::entity::{AppError, SwapAction, SwapQuote};
use crate::raydium::curve::{minimum_amount_out, price_impact, slippage_to_bps, swap_base_input};
use crate::raydium::layout::{AmmConfig, CpmmPoolState};
use crate::raydium::CPMM_PROGRAM_ID;
use crate::solana::client::ChainClient;
use crate::solana::tokens::account::decode_token_account;
use crate::solana::utils::{to_raw_amount, ui_amount};

/// Which side of the pool holds wrapped SOL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolSide {
    Token0,
    Token1,
}

/// One side of a swap, resolved against pool state
#[derive(Debug, Clone, Copy)]
pub struct SwapLeg {
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub program: Pubkey,
    pub decimals: u8,
    pub reserve: u64,
}

/// Pool state plus tradable reserves, read in one pass.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub pool_id: Pubkey,
    pub state: CpmmPoolState,
    pub config: AmmConfig,
    /// Vault balance minus accrued protocol and fund fees
    pub reserve_0: u64,
    pub reserve_1: u64,
}

/// Fetch and decode a CPMM pool, its fee config and both vaults
pub async fn load_pool(chain: &dyn ChainClient, pool_id: &Pubkey) -> Result<PoolSnapshot> {
    let pool_account = chain
        .get_account(pool_id)
        .await?
        .ok_or_else(|| AppError::RaydiumPool(format!("pool {} not found", pool_id)))?;

    if pool_account.owner != CPMM_PROGRAM_ID {
        return Err(AppError::RaydiumPool(format!("{} is not a CPMM pool", pool_id)).into());
    }

    let state = CpmmPoolState::decode(&pool_account.data)
        .with_context(|| format!("Failed to decode pool {}", pool_id))?;

    let accounts = chain
        .get_multiple_accounts(&[state.amm_config, state.token_0_vault, state.token_1_vault])
        .await?;
    let [config_account, vault_0, vault_1]: [_; 3] = accounts
        .try_into()
        .map_err(|_| anyhow!("Unexpected account count for pool {}", pool_id))?;

    let config_account =
        config_account.ok_or_else(|| anyhow!("AMM config {} not found", state.amm_config))?;
    let config = AmmConfig::decode(&config_account.data)?;

    let vault_0 = vault_0.ok_or_else(|| anyhow!("Vault {} not found", state.token_0_vault))?;
    let vault_1 = vault_1.ok_or_else(|| anyhow!("Vault {} not found", state.token_1_vault))?;
    let vault_0_amount = decode_token_account(&vault_0.data)?.amount;
    let vault_1_amount = decode_token_account(&vault_1.data)?.amount;

    let reserve_0 = vault_0_amount
        .saturating_sub(state.protocol_fees_token_0)
        .saturating_sub(state.fund_fees_token_0);
    let reserve_1 = vault_1_amount
        .saturating_sub(state.protocol_fees_token_1)
        .saturating_sub(state.fund_fees_token_1);

    debug!(
        "Pool {} reserves: {} {} / {} {}",
        pool_id, reserve_0, state.token_0_mint, reserve_1, state.token_1_mint
    );

    Ok(PoolSnapshot {
        pool_id: *pool_id,
        state,
        config,
        reserve_0,
        reserve_1,
    })
}

impl PoolSnapshot {
    pub fn sol_side(&self) -> Result<SolSide, AppError> {
        let wsol = spl_token::native_mint::id();
        if self.state.token_0_mint == wsol {
            Ok(SolSide::Token0)
        } else if self.state.token_1_mint == wsol {
            Ok(SolSide::Token1)
        } else {
            Err(AppError::PoolWithoutSol(self.pool_id.to_string()))
        }
    }

    fn leg_0(&self) -> SwapLeg {
        SwapLeg {
            mint: self.state.token_0_mint,
            vault: self.state.token_0_vault,
            program: self.state.token_0_program,
            decimals: self.state.mint_0_decimals,
            reserve: self.reserve_0,
        }
    }

    fn leg_1(&self) -> SwapLeg {
        SwapLeg {
            mint: self.state.token_1_mint,
            vault: self.state.token_1_vault,
            program: self.state.token_1_program,
            decimals: self.state.mint_1_decimals,
            reserve: self.reserve_1,
        }
    }

    /// (SOL leg, pool token leg)
    pub fn legs(&self) -> Result<(SwapLeg, SwapLeg), AppError> {
        Ok(match self.sol_side()? {
            SolSide::Token0 => (self.leg_0(), self.leg_1()),
            SolSide::Token1 => (self.leg_1(), self.leg_0()),
        })
    }

    /// (input leg, output leg) for the given direction
    pub fn route(&self, action: SwapAction) -> Result<(SwapLeg, SwapLeg), AppError> {
        let (sol, token) = self.legs()?;
        Ok(match action {
            SwapAction::Buy => (sol, token),
            SwapAction::Sell => (token, sol),
        })
    }

    /// SOL per one whole pool token
    pub fn price_in_sol(&self) -> Result<f64, AppError> {
        let (sol, token) = self.legs()?;
        if sol.reserve == 0 || token.reserve == 0 {
            return Err(AppError::EmptyReserves(self.pool_id.to_string()));
        }
        Ok(ui_amount(sol.reserve, sol.decimals) / ui_amount(token.reserve, token.decimals))
    }

    /// Run the curve for `amount` whole units of the input token
    pub fn quote(&self, action: SwapAction, amount: f64, slippage: f64) -> Result<SwapQuote, AppError> {
        let slippage_bps = slippage_to_bps(slippage)?;
        let (input, output) = self.route(action)?;
        let amount_in = to_raw_amount(amount, input.decimals)?;

        if input.reserve == 0 || output.reserve == 0 {
            return Err(AppError::EmptyReserves(self.pool_id.to_string()));
        }
        if self.state.swap_disabled() {
            return Err(AppError::RaydiumPool(format!(
                "swaps are disabled on pool {}",
                self.pool_id
            )));
        }

        let calculation = swap_base_input(
            amount_in,
            input.reserve,
            output.reserve,
            self.config.trade_fee_rate,
        )
        .ok_or(AppError::InvalidAmount)?;

        Ok(SwapQuote {
            input_mint: input.mint.to_string(),
            output_mint: output.mint.to_string(),
            input_decimals: input.decimals,
            output_decimals: output.decimals,
            amount_in,
            amount_out: calculation.destination_amount_swapped,
            min_amount_out: minimum_amount_out(
                calculation.destination_amount_swapped,
                slippage_bps,
            ),
            fee: calculation.trade_fee,
            price_impact: price_impact(&calculation, input.reserve, output.reserve),
        })
    }
}
