pub mod client;
pub mod memory;
pub mod tokens;
pub mod utils;
pub mod wallet;

// Re-export commonly used items
pub use client::{create_solana_client, ChainClient, RawTokenAccount, RpcChainClient};
pub use memory::InMemoryChain;
pub use tokens::{get_token_balances, send_sol, send_spl_token};
pub use utils::{lamports_to_sol, to_raw_amount, ui_amount};
pub use wallet::{keypair_from_base58, keypair_to_base58, parse_pubkey, parse_user_pubkey};
