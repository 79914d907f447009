use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use super::{required_str, ApiResult, AppState};
use crate::entity::WalletSnapshot;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfoRequest {
    pub private_key: Option<String>,
}

/// `POST /wallet-info`
pub async fn wallet_info(
    State(services): State<AppState>,
    payload: Result<Json<WalletInfoRequest>, JsonRejection>,
) -> ApiResult<Json<WalletSnapshot>> {
    let Json(request) = payload?;
    let private_key = required_str(request.private_key)?;

    let snapshot = services
        .wallet_interactor()
        .get_wallet_info(&private_key)
        .await?;

    Ok(Json(snapshot))
}
