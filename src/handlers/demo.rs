use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::auth::session_token;
use super::{cookie_value, required, required_str, set_cookie, ApiResult, AppState};
use crate::demo::{DemoError, DemoState};

/// Cookie naming an anonymous visitor's demo session
pub const DEMO_SESSION_COOKIE: &str = "demo_session";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoTradeRequest {
    pub token_id: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSendRequest {
    pub recipient: Option<String>,
    pub amount: Option<f64>,
    pub token_id: Option<String>,
}

/// Demo session of the caller: the signed-in user when the session token
/// verifies, otherwise the `demo_session` cookie.
fn demo_session(services: &AppState, headers: &HeaderMap) -> Option<String> {
    let user = session_token(headers)
        .and_then(|token| services.auth_interactor().authenticate(&token).ok());
    if let Some(claims) = user {
        return Some(format!("user:{}", claims.sub));
    }

    cookie_value(headers, DEMO_SESSION_COOKIE)
        .and_then(|value| Uuid::parse_str(&value).ok())
        .map(|id| format!("anon:{}", id))
}

/// Sessionless callers have never entered demo mode
fn active_session(services: &AppState, headers: &HeaderMap) -> ApiResult<String> {
    demo_session(services, headers).ok_or_else(|| DemoError::Inactive.into())
}

/// `GET /demo`
pub async fn state(State(services): State<AppState>, headers: HeaderMap) -> Json<DemoState> {
    let state = match demo_session(&services, &headers) {
        Some(session) => services.demo_interactor().state(&session).await,
        None => DemoState::default(),
    };
    Json(state)
}

/// `POST /demo/enter`; anonymous callers without a session get a new
/// `demo_session` cookie
pub async fn enter(State(services): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Some(session) = demo_session(&services, &headers) {
        let state = services.demo_interactor().enter(&session).await?;
        return Ok(Json(state).into_response());
    }

    let id = Uuid::new_v4();
    let state = services
        .demo_interactor()
        .enter(&format!("anon:{}", id))
        .await?;
    let cookie = set_cookie(
        DEMO_SESSION_COOKIE,
        &id.to_string(),
        None,
        services.cookie_secure(),
    );

    Ok(([(header::SET_COOKIE, cookie)], Json(state)).into_response())
}

/// `POST /demo/exit`
pub async fn exit(
    State(services): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DemoState>> {
    let state = match demo_session(&services, &headers) {
        Some(session) => services.demo_interactor().exit(&session).await?,
        None => DemoState::default(),
    };
    Ok(Json(state))
}

/// `POST /demo/buy`
pub async fn buy(
    State(services): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DemoTradeRequest>, JsonRejection>,
) -> ApiResult<Json<DemoState>> {
    let Json(request) = payload?;
    let token_id = required_str(request.token_id)?;
    let amount = required(request.amount)?;
    let session = active_session(&services, &headers)?;

    let state = services
        .demo_interactor()
        .buy(&session, &token_id, amount)
        .await?;
    Ok(Json(state))
}

/// `POST /demo/sell`
pub async fn sell(
    State(services): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DemoTradeRequest>, JsonRejection>,
) -> ApiResult<Json<DemoState>> {
    let Json(request) = payload?;
    let token_id = required_str(request.token_id)?;
    let amount = required(request.amount)?;
    let session = active_session(&services, &headers)?;

    let state = services
        .demo_interactor()
        .sell(&session, &token_id, amount)
        .await?;
    Ok(Json(state))
}

/// `POST /demo/send`; without `tokenId` the amount is SOL
pub async fn send(
    State(services): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DemoSendRequest>, JsonRejection>,
) -> ApiResult<Json<DemoState>> {
    let Json(request) = payload?;
    let recipient = required_str(request.recipient)?;
    let amount = required(request.amount)?;
    let token_id = request.token_id.filter(|id| !id.trim().is_empty());
    let session = active_session(&services, &headers)?;

    let state = services
        .demo_interactor()
        .send(&session, &recipient, amount, token_id.as_deref())
        .await?;

    Ok(Json(state))
}
