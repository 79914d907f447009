use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletToken {
    pub name: String,
    pub symbol: String,
    pub balance: f64,
    pub mint: String,
    pub decimals: u8,
}
