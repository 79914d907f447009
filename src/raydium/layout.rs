use anyhow::{anyhow, Result};
use solana_sdk::pubkey::Pubkey;

use crate::raydium::anchor_discriminator;
use crate::solana::tokens::account::{read_pubkey, read_u64};

/// Fields of a CPMM `PoolState` account needed to price and route a swap.
///
/// The account is zero-copy and packed; offsets include the 8-byte discriminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpmmPoolState {
    pub amm_config: Pubkey,
    pub token_0_vault: Pubkey,
    pub token_1_vault: Pubkey,
    pub token_0_mint: Pubkey,
    pub token_1_mint: Pubkey,
    pub token_0_program: Pubkey,
    pub token_1_program: Pubkey,
    pub observation_key: Pubkey,
    pub status: u8,
    pub mint_0_decimals: u8,
    pub mint_1_decimals: u8,
    pub protocol_fees_token_0: u64,
    pub protocol_fees_token_1: u64,
    pub fund_fees_token_0: u64,
    pub fund_fees_token_1: u64,
    pub open_time: u64,
}

impl CpmmPoolState {
    pub const AMM_CONFIG: usize = 8;
    pub const TOKEN_0_VAULT: usize = 72;
    pub const TOKEN_1_VAULT: usize = 104;
    pub const TOKEN_0_MINT: usize = 168;
    pub const TOKEN_1_MINT: usize = 200;
    pub const TOKEN_0_PROGRAM: usize = 232;
    pub const TOKEN_1_PROGRAM: usize = 264;
    pub const OBSERVATION_KEY: usize = 296;
    pub const STATUS: usize = 329;
    pub const MINT_0_DECIMALS: usize = 331;
    pub const MINT_1_DECIMALS: usize = 332;
    pub const PROTOCOL_FEES_TOKEN_0: usize = 341;
    pub const PROTOCOL_FEES_TOKEN_1: usize = 349;
    pub const FUND_FEES_TOKEN_0: usize = 357;
    pub const FUND_FEES_TOKEN_1: usize = 365;
    pub const OPEN_TIME: usize = 373;
    /// Bytes up to and including `recent_epoch`
    pub const MIN_LEN: usize = 389;

    pub fn decode(data: &[u8]) -> Result<Self> {
        check_account(data, "PoolState", Self::MIN_LEN)?;

        Ok(Self {
            amm_config: read_pubkey(data, Self::AMM_CONFIG)?,
            token_0_vault: read_pubkey(data, Self::TOKEN_0_VAULT)?,
            token_1_vault: read_pubkey(data, Self::TOKEN_1_VAULT)?,
            token_0_mint: read_pubkey(data, Self::TOKEN_0_MINT)?,
            token_1_mint: read_pubkey(data, Self::TOKEN_1_MINT)?,
            token_0_program: read_pubkey(data, Self::TOKEN_0_PROGRAM)?,
            token_1_program: read_pubkey(data, Self::TOKEN_1_PROGRAM)?,
            observation_key: read_pubkey(data, Self::OBSERVATION_KEY)?,
            status: data[Self::STATUS],
            mint_0_decimals: data[Self::MINT_0_DECIMALS],
            mint_1_decimals: data[Self::MINT_1_DECIMALS],
            protocol_fees_token_0: read_u64(data, Self::PROTOCOL_FEES_TOKEN_0)?,
            protocol_fees_token_1: read_u64(data, Self::PROTOCOL_FEES_TOKEN_1)?,
            fund_fees_token_0: read_u64(data, Self::FUND_FEES_TOKEN_0)?,
            fund_fees_token_1: read_u64(data, Self::FUND_FEES_TOKEN_1)?,
            open_time: read_u64(data, Self::OPEN_TIME)?,
        })
    }

    /// Swaps are disabled when bit 2 of `status` is set
    pub fn swap_disabled(&self) -> bool {
        self.status & 0b100 != 0
    }
}

/// Fee settings shared by every pool created under one config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmConfig {
    pub index: u16,
    pub trade_fee_rate: u64,
    pub protocol_fee_rate: u64,
    pub fund_fee_rate: u64,
}

impl AmmConfig {
    pub const INDEX: usize = 10;
    pub const TRADE_FEE_RATE: usize = 12;
    pub const PROTOCOL_FEE_RATE: usize = 20;
    pub const FUND_FEE_RATE: usize = 28;
    pub const MIN_LEN: usize = 44;

    pub fn decode(data: &[u8]) -> Result<Self> {
        check_account(data, "AmmConfig", Self::MIN_LEN)?;

        Ok(Self {
            index: u16::from_le_bytes([data[Self::INDEX], data[Self::INDEX + 1]]),
            trade_fee_rate: read_u64(data, Self::TRADE_FEE_RATE)?,
            protocol_fee_rate: read_u64(data, Self::PROTOCOL_FEE_RATE)?,
            fund_fee_rate: read_u64(data, Self::FUND_FEE_RATE)?,
        })
    }
}

fn check_account(data: &[u8], name: &str, min_len: usize) -> Result<()> {
    if data.len() < min_len {
        return Err(anyhow!("{} account too short: {} bytes", name, data.len()));
    }
    if data[..8] != anchor_discriminator("account", name) {
        return Err(anyhow!("Account is not a CPMM {}", name));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn put_pubkey(data: &mut [u8], offset: usize, key: &Pubkey) {
        data[offset..offset + 32].copy_from_slice(key.as_ref());
    }

    fn put_u64(data: &mut [u8], offset: usize, value: u64) {
        data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    /// Serialize the fields `decode` reads into a full-size pool account.
    pub(crate) fn pool_state_bytes(state: &CpmmPoolState) -> Vec<u8> {
        let mut data = vec![0u8; 637];
        data[..8].copy_from_slice(&anchor_discriminator("account", "PoolState"));
        put_pubkey(&mut data, CpmmPoolState::AMM_CONFIG, &state.amm_config);
        put_pubkey(&mut data, CpmmPoolState::TOKEN_0_VAULT, &state.token_0_vault);
        put_pubkey(&mut data, CpmmPoolState::TOKEN_1_VAULT, &state.token_1_vault);
        put_pubkey(&mut data, CpmmPoolState::TOKEN_0_MINT, &state.token_0_mint);
        put_pubkey(&mut data, CpmmPoolState::TOKEN_1_MINT, &state.token_1_mint);
        put_pubkey(&mut data, CpmmPoolState::TOKEN_0_PROGRAM, &state.token_0_program);
        put_pubkey(&mut data, CpmmPoolState::TOKEN_1_PROGRAM, &state.token_1_program);
        put_pubkey(&mut data, CpmmPoolState::OBSERVATION_KEY, &state.observation_key);
        data[CpmmPoolState::STATUS] = state.status;
        data[CpmmPoolState::MINT_0_DECIMALS] = state.mint_0_decimals;
        data[CpmmPoolState::MINT_1_DECIMALS] = state.mint_1_decimals;
        put_u64(&mut data, CpmmPoolState::PROTOCOL_FEES_TOKEN_0, state.protocol_fees_token_0);
        put_u64(&mut data, CpmmPoolState::PROTOCOL_FEES_TOKEN_1, state.protocol_fees_token_1);
        put_u64(&mut data, CpmmPoolState::FUND_FEES_TOKEN_0, state.fund_fees_token_0);
        put_u64(&mut data, CpmmPoolState::FUND_FEES_TOKEN_1, state.fund_fees_token_1);
        put_u64(&mut data, CpmmPoolState::OPEN_TIME, state.open_time);
        data
    }

    pub(crate) fn amm_config_bytes(trade_fee_rate: u64) -> Vec<u8> {
        let mut data = vec![0u8; 236];
        data[..8].copy_from_slice(&anchor_discriminator("account", "AmmConfig"));
        put_u64(&mut data, AmmConfig::TRADE_FEE_RATE, trade_fee_rate);
        put_u64(&mut data, AmmConfig::PROTOCOL_FEE_RATE, 120_000);
        put_u64(&mut data, AmmConfig::FUND_FEE_RATE, 40_000);
        data
    }

    pub(crate) fn sample_state() -> CpmmPoolState {
        CpmmPoolState {
            amm_config: Pubkey::new_unique(),
            token_0_vault: Pubkey::new_unique(),
            token_1_vault: Pubkey::new_unique(),
            token_0_mint: spl_token::native_mint::id(),
            token_1_mint: Pubkey::new_unique(),
            token_0_program: spl_token::id(),
            token_1_program: spl_token::id(),
            observation_key: Pubkey::new_unique(),
            status: 0,
            mint_0_decimals: 9,
            mint_1_decimals: 6,
            protocol_fees_token_0: 11,
            protocol_fees_token_1: 22,
            fund_fees_token_0: 33,
            fund_fees_token_1: 44,
            open_time: 1_700_000_000,
        }
    }

    #[test]
    fn decodes_pool_state_fields() {
        let state = sample_state();
        let decoded = CpmmPoolState::decode(&pool_state_bytes(&state)).unwrap();
        assert_eq!(decoded, state);
        assert!(!decoded.swap_disabled());
    }

    #[test]
    fn rejects_foreign_accounts() {
        let mut data = pool_state_bytes(&sample_state());
        data[0] ^= 0xff;
        assert!(CpmmPoolState::decode(&data).is_err());
        assert!(CpmmPoolState::decode(&data[..100]).is_err());
        // an AmmConfig is not a pool
        assert!(CpmmPoolState::decode(&amm_config_bytes(2_500)).is_err());
    }

    #[test]
    fn decodes_amm_config() {
        let config = AmmConfig::decode(&amm_config_bytes(2_500)).unwrap();
        assert_eq!(config.trade_fee_rate, 2_500);
        assert_eq!(config.protocol_fee_rate, 120_000);
        assert_eq!(config.fund_fee_rate, 40_000);
    }

    #[test]
    fn status_bit_disables_swaps() {
        let mut state = sample_state();
        state.status = 0b100;
        let decoded = CpmmPoolState::decode(&pool_state_bytes(&state)).unwrap();
        assert!(decoded.swap_disabled());
    }
}
