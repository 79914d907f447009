pub mod account;
pub mod constants;
pub mod native;
pub mod spl;

pub use account::{decode_mint_decimals, decode_token_account, TokenAccountInfo};
pub use native::send_sol;
pub use spl::{get_token_balances, send_spl_token};
