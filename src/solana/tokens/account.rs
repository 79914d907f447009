use anyhow::{anyhow, Result};
use solana_sdk::pubkey::Pubkey;

use crate::solana::tokens::constants::{
    MINT_DECIMALS_OFFSET, TOKEN_ACCOUNT_AMOUNT_OFFSET, TOKEN_ACCOUNT_MIN_LEN,
    TOKEN_ACCOUNT_MINT_OFFSET, TOKEN_ACCOUNT_OWNER_OFFSET,
};

/// Fields read from the fixed prefix of a token account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenAccountInfo {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

pub(crate) fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    let bytes: [u8; 32] = data
        .get(offset..offset + 32)
        .ok_or_else(|| anyhow!("Account data too short for pubkey at {}", offset))?
        .try_into()?;
    Ok(Pubkey::new_from_array(bytes))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    let bytes: [u8; 8] = data
        .get(offset..offset + 8)
        .ok_or_else(|| anyhow!("Account data too short for u64 at {}", offset))?
        .try_into()?;
    Ok(u64::from_le_bytes(bytes))
}

/// Decode an SPL Token or Token-2022 account. Extensions past the base layout are ignored.
pub fn decode_token_account(data: &[u8]) -> Result<TokenAccountInfo> {
    if data.len() < TOKEN_ACCOUNT_MIN_LEN {
        return Err(anyhow!("Token account data too short: {} bytes", data.len()));
    }

    Ok(TokenAccountInfo {
        mint: read_pubkey(data, TOKEN_ACCOUNT_MINT_OFFSET)?,
        owner: read_pubkey(data, TOKEN_ACCOUNT_OWNER_OFFSET)?,
        amount: read_u64(data, TOKEN_ACCOUNT_AMOUNT_OFFSET)?,
    })
}

/// Read the decimals byte of a mint account.
pub fn decode_mint_decimals(data: &[u8]) -> Result<u8> {
    data.get(MINT_DECIMALS_OFFSET)
        .copied()
        .ok_or_else(|| anyhow!("Mint account data too short: {} bytes", data.len()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 165-byte token account with the given fields.
    pub(crate) fn token_account_bytes(mint: &Pubkey, owner: &Pubkey, amount: u64) -> Vec<u8> {
        let mut data = vec![0u8; 165];
        data[0..32].copy_from_slice(mint.as_ref());
        data[32..64].copy_from_slice(owner.as_ref());
        data[64..72].copy_from_slice(&amount.to_le_bytes());
        data
    }

    /// 82-byte mint with the given decimals.
    pub(crate) fn mint_bytes(decimals: u8) -> Vec<u8> {
        let mut data = vec![0u8; 82];
        data[44] = decimals;
        data[45] = 1; // is_initialized
        data
    }

    #[test]
    fn decodes_token_account_prefix() {
        let mint = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let data = token_account_bytes(&mint, &owner, 42_000);

        let info = decode_token_account(&data).unwrap();
        assert_eq!(info.mint, mint);
        assert_eq!(info.owner, owner);
        assert_eq!(info.amount, 42_000);
    }

    #[test]
    fn token_2022_extensions_are_ignored() {
        let mint = Pubkey::new_unique();
        let mut data = token_account_bytes(&mint, &Pubkey::new_unique(), 7);
        data.extend_from_slice(&[2u8; 40]);

        assert_eq!(decode_token_account(&data).unwrap().amount, 7);
    }

    #[test]
    fn short_buffers_are_rejected() {
        assert!(decode_token_account(&[0u8; 71]).is_err());
        assert!(decode_mint_decimals(&[0u8; 44]).is_err());
        assert_eq!(decode_mint_decimals(&mint_bytes(6)).unwrap(), 6);
    }
}
