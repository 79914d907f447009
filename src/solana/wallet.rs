use anyhow::{anyhow, Result};
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::keypair::keypair_from_seed,
};
use std::str::FromStr;

use crate::entity::AppError;

/// Serialize Keypair (64 bytes) to base58.
pub fn keypair_to_base58(keypair: &Keypair) -> String {
    bs58::encode(keypair.to_bytes()).into_string()
}

/// Restore Keypair from a base58 string.
///
/// Accepts the usual 64-byte secret+public form and a bare 32-byte ed25519 seed.
pub fn keypair_from_base58(keypair_base58: &str) -> Result<Keypair> {
    let keypair_bytes = bs58::decode(keypair_base58.trim())
        .into_vec()
        .map_err(|e| AppError::InvalidPrivateKey(format!("not base58: {}", e)))?;

    match keypair_bytes.len() {
        64 => Keypair::try_from(keypair_bytes.as_slice())
            .map_err(|e| AppError::InvalidPrivateKey(e.to_string()).into()),
        32 => keypair_from_seed(&keypair_bytes)
            .map_err(|e| AppError::InvalidPrivateKey(e.to_string()).into()),
        len => Err(AppError::InvalidPrivateKey(format!("invalid key length: {}", len)).into()),
    }
}

/// Convert base58 string to Solana `Pubkey`.
pub fn parse_pubkey(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address.trim()).map_err(|e| anyhow!("Invalid Solana address: {}", e))
}

/// Like [`parse_pubkey`], but reports a caller error.
pub fn parse_user_pubkey(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address.trim())
        .map_err(|_| AppError::InvalidAddress(address.to_string()).into())
}
