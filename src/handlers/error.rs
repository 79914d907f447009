use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;

use crate::demo::DemoError;
use crate::entity::AppError;

/// Error returned by every handler, rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    Unprocessable(String),
    Internal(String),
}

impl ApiError {
    pub fn missing_fields() -> Self {
        ApiError::BadRequest("Missing required fields".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Internal(msg) => msg,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let message = err.to_string();
        match err {
            AppError::MissingFields(_)
            | AppError::InvalidPrivateKey(_)
            | AppError::InvalidAddress(_)
            | AppError::InvalidAmount
            | AppError::InvalidSlippage(_)
            | AppError::InvalidAction(_)
            | AppError::InsufficientFunds
            | AppError::PoolWithoutSol(_)
            | AppError::RaydiumPool(_)
            | AppError::TokenNotFound(_)
            | AppError::InvalidInput(_) => ApiError::BadRequest(message),
            AppError::InvalidCredentials | AppError::Unauthorized => ApiError::Unauthorized(message),
            AppError::UserExists => ApiError::Conflict(message),
            AppError::EmptyReserves(_) => ApiError::Unprocessable(message),
            AppError::SolanaClient(_) => ApiError::Internal(message),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<AppError>() {
            Ok(app_error) => return app_error.into(),
            Err(err) => err,
        };
        match err.downcast::<DemoError>() {
            Ok(demo_error) => demo_error.into(),
            Err(err) => ApiError::Internal(format!("{:#}", err)),
        }
    }
}

/// Every demo failure is a rejected request
impl From<DemoError> for ApiError {
    fn from(err: DemoError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.message());
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
