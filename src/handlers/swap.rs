use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{required, required_str, ApiResult, AppState};
use crate::entity::{PoolPrice, SwapAction, SwapParams, SwapQuote};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub action: Option<String>,
    pub private_key: Option<String>,
    pub pool_id: Option<String>,
    pub amount: Option<f64>,
    pub slippage: Option<f64>,
}

impl SwapRequest {
    fn params(&self) -> ApiResult<SwapParams> {
        let action: SwapAction = required_str(self.action.clone())?.parse()?;
        Ok(SwapParams {
            action,
            pool_id: required_str(self.pool_id.clone())?,
            amount: required(self.amount)?,
            slippage: required(self.slippage)?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub status: &'static str,
    pub tx_id: String,
    pub explorer: String,
}

/// Raw integer amounts; decimals tell the client how to scale them
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
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

impl From<SwapQuote> for QuoteResponse {
    fn from(quote: SwapQuote) -> Self {
        Self {
            input_mint: quote.input_mint,
            output_mint: quote.output_mint,
            input_decimals: quote.input_decimals,
            output_decimals: quote.output_decimals,
            amount_in: quote.amount_in,
            amount_out: quote.amount_out,
            min_amount_out: quote.min_amount_out,
            fee: quote.fee,
            price_impact: quote.price_impact,
        }
    }
}

/// `POST /swap`
pub async fn swap(
    State(services): State<AppState>,
    payload: Result<Json<SwapRequest>, JsonRejection>,
) -> ApiResult<Json<SwapResponse>> {
    let Json(request) = payload?;
    let params = request.params()?;
    let private_key = required_str(request.private_key)?;

    let result = services.swap_interactor().swap(&private_key, &params).await?;

    Ok(Json(SwapResponse {
        status: "success",
        tx_id: result.signature,
        explorer: result.explorer,
    }))
}

/// `POST /swap/quote`
pub async fn quote(
    State(services): State<AppState>,
    payload: Result<Json<SwapRequest>, JsonRejection>,
) -> ApiResult<Json<QuoteResponse>> {
    let Json(request) = payload?;
    let params = request.params()?;

    let quote = services.swap_interactor().quote(&params).await?;

    Ok(Json(quote.into()))
}

/// `GET /token-price/:pool_id`
pub async fn token_price(
    State(services): State<AppState>,
    Path(pool_id): Path<String>,
) -> ApiResult<Json<PoolPrice>> {
    let price = services.price_interactor().get_pool_price(&pool_id).await?;
    Ok(Json(price))
}
