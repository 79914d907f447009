use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{required, required_str, ApiResult, AppState};
use crate::entity::TransferRequest;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTokenRequest {
    pub private_key: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<f64>,
    pub mint: Option<String>,
    pub is_native_sol: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SendTokenResponse {
    pub success: bool,
    pub signature: String,
}

/// `POST /send-token`
pub async fn send_token(
    State(services): State<AppState>,
    payload: Result<Json<SendTokenRequest>, JsonRejection>,
) -> ApiResult<Json<SendTokenResponse>> {
    let Json(request) = payload?;
    let transfer = TransferRequest {
        private_key: required_str(request.private_key)?,
        recipient: required_str(request.recipient)?,
        amount: required(request.amount)?,
        is_native_sol: request.is_native_sol.unwrap_or(false),
        mint: request.mint.filter(|mint| !mint.trim().is_empty()),
    };

    let signature = services.send_interactor().send_token(&transfer).await?;

    Ok(Json(SendTokenResponse {
        success: true,
        signature,
    }))
}
