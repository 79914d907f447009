mod app_error;
mod swap;
mod token;
mod token_balance;
mod token_price;
mod transaction;
mod user;
mod wallet_snapshot;

pub use app_error::AppError;
pub use swap::{SwapAction, SwapParams, SwapQuote, SwapResult};
pub use token::Token;
pub use token_balance::WalletToken;
pub use token_price::PoolPrice;
pub use transaction::TransferRequest;
pub use user::UserRecord;
pub use wallet_snapshot::WalletSnapshot;
