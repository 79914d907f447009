use serde::{Deserialize, Serialize};

/// Catalog entry shown on the marketing site and traded in demo mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub sector: String,
    pub market_cap: String, // display string, e.g. "$12.4M"
    pub supply: String,
    pub price: String,
    pub current_value: f64, // price in SOL used for demo trades
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}
