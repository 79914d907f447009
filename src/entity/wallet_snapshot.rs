use serde::{Deserialize, Serialize};

use super::WalletToken;

/// Balances of one wallet, read fresh from the chain on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    pub wallet_address: String,
    pub tokens: Vec<WalletToken>,
}
