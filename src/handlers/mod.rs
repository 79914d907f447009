//! axum handlers, one module per feature area. Each handler parses the
//! request body, calls one interactor from the [`ServiceContainer`] and maps
//! the outcome to JSON.

pub mod auth;
pub mod catalog;
pub mod demo;
pub mod error;
pub mod health;
pub mod swap;
pub mod transfer;
pub mod wallet;

use std::sync::Arc;

use axum::http::{header, HeaderMap};

use crate::di::ServiceContainer;

pub use error::{ApiError, ApiResult};

/// Shared handler state
pub type AppState = Arc<ServiceContainer>;

/// Unwrap a required request field or fail with 400
pub(crate) fn required<T>(field: Option<T>) -> ApiResult<T> {
    field.ok_or_else(ApiError::missing_fields)
}

/// Like [`required`], treating blank strings as missing
pub(crate) fn required_str(field: Option<String>) -> ApiResult<String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::missing_fields()),
    }
}

/// Value of the named cookie from the request's `Cookie` headers
pub(crate) fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for an HttpOnly, site-wide cookie. Without `max_age`
/// the cookie lasts for the browser session.
pub(crate) fn set_cookie(name: &str, value: &str, max_age: Option<i64>, secure: bool) -> String {
    let mut cookie = format!("{}={}; HttpOnly; Path=/; SameSite=Lax", name, value);
    if let Some(max_age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookies_are_found_by_exact_name() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("xtoken=1; token=abc; empty="),
        );

        assert_eq!(cookie_value(&headers, "token").as_deref(), Some("abc"));
        assert_eq!(cookie_value(&headers, "empty"), None);
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn secure_and_max_age_are_optional() {
        assert_eq!(
            set_cookie("token", "t", Some(60), true),
            "token=t; HttpOnly; Path=/; SameSite=Lax; Max-Age=60; Secure"
        );
        assert_eq!(
            set_cookie("demo_session", "s", None, false),
            "demo_session=s; HttpOnly; Path=/; SameSite=Lax"
        );
    }
}
