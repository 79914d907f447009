use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::AppError;

/// Direction of a swap against a SOL-paired pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwapAction {
    /// SOL in, pool token out
    Buy,
    /// Pool token in, SOL out
    Sell,
}

impl std::fmt::Display for SwapAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapAction::Buy => write!(f, "buy"),
            SwapAction::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for SwapAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(SwapAction::Buy),
            "sell" => Ok(SwapAction::Sell),
            other => Err(AppError::InvalidAction(other.to_string())),
        }
    }
}

/// Validated swap parameters.
#[derive(Debug, Clone)]
pub struct SwapParams {
    pub action: SwapAction,
    pub pool_id: String,
    pub amount: f64,
    pub slippage: f64,
}

/// Result of running the constant-product curve on current pool reserves.
/// Amounts are raw integer units of their mint.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapQuote {
    pub input_mint: String,
    pub output_mint: String,
    pub input_decimals: u8,
    pub output_decimals: u8,
    pub amount_in: u64,
    pub amount_out: u64,
    pub min_amount_out: u64,
    pub fee: u64,
    pub price_impact: f64,
}

#[derive(Debug, Clone)]
pub struct SwapResult {
    pub signature: String,
    /// Block explorer link for `signature`
    pub explorer: String,
    pub quote: SwapQuote,
}
