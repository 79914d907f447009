use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{ApiError, ApiResult, AppState};
use crate::catalog::ALL_SECTORS;
use crate::entity::Token;

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub sector: Option<String>,
}

/// `GET /tokens?sector=`
pub async fn list_tokens(
    State(services): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Json<Vec<Token>> {
    let catalog = services.catalog();
    let sector = query.sector.as_deref().unwrap_or(ALL_SECTORS);
    let tokens = catalog
        .filter_by_sector(sector)
        .into_iter()
        .cloned()
        .collect();

    Json(tokens)
}

/// `GET /tokens/:id`
pub async fn get_token(
    State(services): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Token>> {
    let catalog = services.catalog();
    catalog
        .find(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Token not found: {}", id)))
}

/// `GET /sectors`: filter choices, `"all"` first
pub async fn list_sectors(State(services): State<AppState>) -> Json<Vec<String>> {
    let catalog = services.catalog();
    let sectors = std::iter::once(ALL_SECTORS)
        .chain(catalog.sectors())
        .map(str::to_string)
        .collect();

    Json(sectors)
}
