use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolPrice {
    pub pool_id: String,
    pub price_in_sol: f64,
}
