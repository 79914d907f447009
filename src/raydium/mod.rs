//! Raydium constant-product (CPMM) pools: account layouts, curve math and
//! swap instruction construction.

pub mod curve;
pub mod instruction;
pub mod layout;
pub mod pool;

use sha2::{Digest, Sha256};
use solana_sdk::{pubkey, pubkey::Pubkey};

pub use curve::{slippage_to_bps, SwapCalculation};
pub use layout::{AmmConfig, CpmmPoolState};
pub use pool::{load_pool, PoolSnapshot};

/// Raydium CPMM program on mainnet
pub const CPMM_PROGRAM_ID: Pubkey = pubkey!("CPMMoo8L3F4NbTegBCKVNunggL7H1ZpdTHKxQB5qKP1C");

/// Seed of the PDA that owns pool vaults
pub const AUTH_SEED: &[u8] = b"vault_and_lp_mint_auth_seed";

/// Fee rates are expressed in millionths
pub const FEE_RATE_DENOMINATOR: u64 = 1_000_000;

/// First eight bytes of `sha256("<namespace>:<name>")`, as Anchor lays them out.
pub fn anchor_discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("{}:{}", namespace, name).as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest[..8]);
    discriminator
}

/// Authority PDA that signs for pool vaults
pub fn pool_authority() -> Pubkey {
    Pubkey::find_program_address(&[AUTH_SEED], &CPMM_PROGRAM_ID).0
}
