use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{cookie_value, required_str, set_cookie, ApiError, ApiResult, AppState};

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub totp_secret: String,
    pub otpauth_url: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub totp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: String,
}

/// `POST /api/register`
pub async fn register(
    State(services): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(request) = payload?;
    let email = required_str(request.email)?;
    let password = required_str(request.password)?;

    let registration = services.auth_interactor().register(&email, &password).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered. Add the TOTP secret to your authenticator app.".to_string(),
            totp_secret: registration.user.totp_secret,
            otpauth_url: registration.otpauth_url,
        }),
    ))
}

/// `POST /api/login`; the token is returned in the body and as an HttpOnly cookie
pub async fn login(
    State(services): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let email = required_str(request.email)?;
    let password = required_str(request.password)?;
    let totp = required_str(request.totp)?;

    let auth = services.auth_interactor();
    let token = auth.login(&email, &password, &totp).await?;
    let cookie = set_cookie(
        TOKEN_COOKIE,
        &token,
        Some(auth.token_ttl_secs()),
        services.cookie_secure(),
    );

    Ok(([(header::SET_COOKIE, cookie)], Json(LoginResponse { token })).into_response())
}

/// `GET /api/me`
pub async fn me(State(services): State<AppState>, headers: HeaderMap) -> ApiResult<Json<MeResponse>> {
    let token = session_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

    let claims = services.auth_interactor().authenticate(&token)?;

    Ok(Json(MeResponse {
        id: claims.sub,
        email: claims.email,
    }))
}

/// Bearer token from `Authorization`, falling back to the session cookie
pub(crate) fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    cookie_value(headers, TOKEN_COOKIE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_is_read_from_bearer_or_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; token=abc.def"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }
}
