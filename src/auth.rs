//! API key authentication for the protected routes.
//!
//! The board surface and health checks stay public; everything under /api
//! requires an `X-API-Key` header. A missing or invalid key is reported as a
//! session expiry so the client layer's failure policy can route the user
//! back to the login screen.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::env;

use crate::errors::AppError;

/// API key authentication errors
#[derive(Debug)]
pub enum AuthError {
    MissingApiKey,
    InvalidApiKey,
    NotConfigured,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingApiKey | AuthError::InvalidApiKey => {
                AppError::SessionExpired.into_response()
            }
            AuthError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "code": "AUTH_NOT_CONFIGURED",
                    "message": "API keys not configured. Set TODOPILOT_API_KEYS environment variable.",
                })),
            )
                .into_response(),
        }
    }
}

/// Constant-time string comparison to prevent timing attacks
///
/// Note: This leaks the length of the shorter string, which is acceptable
/// for API keys where lengths are not secret.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let mut result = (a.len() ^ b.len()) as u8;

    let min_len = std::cmp::min(a.len(), b.len());
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    for i in 0..min_len {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}

/// Validate API key against configured keys using constant-time comparison
pub fn validate_api_key(provided_key: &str) -> Result<(), AuthError> {
    // Comma-separated for multiple keys
    let valid_keys = match env::var("TODOPILOT_API_KEYS") {
        Ok(keys) if !keys.trim().is_empty() => keys,
        _ => {
            let is_production = env::var("TODOPILOT_ENV")
                .map(|v| v.to_lowercase() == "production" || v.to_lowercase() == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!("TODOPILOT_API_KEYS not set in production mode");
                return Err(AuthError::NotConfigured);
            }

            tracing::warn!(
                "TODOPILOT_API_KEYS not set - using development key (not for production!)"
            );
            "todopilot-dev-key-change-in-production".to_string()
        }
    };

    let keys: Vec<&str> = valid_keys.split(',').map(|k| k.trim()).collect();

    let mut found = false;
    for key in &keys {
        if constant_time_compare(key, provided_key) {
            found = true;
            // Keep checking to maintain constant time
        }
    }

    if found {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}

/// Authentication middleware for protected routes
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let api_key_value = match request
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
    {
        Some(key) => key,
        None => return AuthError::MissingApiKey.into_response(),
    };

    if let Err(e) = validate_api_key(&api_key_value) {
        return e.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_api_key() {
        env::set_var("TODOPILOT_API_KEYS", "key1,key2,key3");

        assert!(validate_api_key("key1").is_ok());
        assert!(validate_api_key("key3").is_ok());
        assert!(validate_api_key("invalid").is_err());

        env::remove_var("TODOPILOT_API_KEYS");
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }
}
