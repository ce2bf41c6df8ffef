//! Structured error types shared by the HTTP handlers and the client layer.
//!
//! Classification happens once, at the point the failure is first observed.
//! Everything downstream matches on the variant instead of re-wrapping, so a
//! provider quota error stays a 429 no matter how many layers it crosses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured error response for API clients
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Application error taxonomy
#[derive(Debug)]
pub enum AppError {
    // Validation errors (400)
    InvalidRequest { field: String, reason: String },

    // Inference provider quota / rate limit (429)
    RateLimited(String),

    // Missing credential or configuration (500)
    ServiceUnavailable(String),

    // Model returned data that failed post-validation (500)
    MalformedModelOutput(String),

    // Inference call failed for any other reason (500, generic message;
    // the raw provider error is logged, never returned to the caller)
    InferenceFailed,

    // Not found (404)
    TodoNotFound(String),
    ArticleNotFound(u64),

    // Expired or invalid session (401) - the client layer reacts by
    // redirecting to the login screen
    SessionExpired,

    // Storage collaborator failures (500)
    StorageError(String),

    // Generic wrapper for unexpected internal errors
    Internal(anyhow::Error),
}

impl AppError {
    /// Get error code for client identification
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "INVALID_REQUEST",
            Self::RateLimited(_) => "RATE_LIMITED",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::MalformedModelOutput(_) => "MALFORMED_MODEL_OUTPUT",
            Self::InferenceFailed => "INFERENCE_FAILED",
            Self::TodoNotFound(_) => "TODO_NOT_FOUND",
            Self::ArticleNotFound(_) => "ARTICLE_NOT_FOUND",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::StorageError(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,

            Self::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,

            Self::TodoNotFound(_) | Self::ArticleNotFound(_) => StatusCode::NOT_FOUND,

            Self::SessionExpired => StatusCode::UNAUTHORIZED,

            Self::ServiceUnavailable(_)
            | Self::MalformedModelOutput(_)
            | Self::InferenceFailed
            | Self::StorageError(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the client-facing message
    pub fn message(&self) -> String {
        match self {
            Self::InvalidRequest { field, reason } => {
                format!("Invalid input for field '{field}': {reason}")
            }
            Self::RateLimited(_) => {
                "AI 요청이 많아 처리할 수 없습니다. 잠시 후 다시 시도해주세요.".to_string()
            }
            Self::ServiceUnavailable(msg) => format!("Service unavailable: {msg}"),
            Self::MalformedModelOutput(_) => {
                "생성된 날짜/시간 형식이 올바르지 않습니다. 다시 시도해주세요.".to_string()
            }
            Self::InferenceFailed => "AI 처리 중 오류가 발생했습니다.".to_string(),
            Self::TodoNotFound(id) => format!("Todo not found: {id}"),
            Self::ArticleNotFound(id) => format!("Article not found: {id}"),
            Self::SessionExpired => "세션이 만료되었습니다. 다시 로그인해주세요.".to_string(),
            Self::StorageError(msg) => format!("Storage error: {msg}"),
            Self::Internal(_) => "요청을 처리하지 못했습니다.".to_string(),
        }
    }

    /// Convert to structured error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.message(),
            details: None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_response();

        if status.is_server_error() {
            tracing::error!(code = self.code(), error = ?self, "request failed");
        }

        (status, Json(body)).into_response()
    }
}

/// Helper trait to convert validation errors
pub trait ValidationErrorExt<T> {
    fn map_validation_err(self, field: &str) -> Result<T>;
}

impl<T> ValidationErrorExt<T> for anyhow::Result<T> {
    fn map_validation_err(self, field: &str) -> Result<T> {
        self.map_err(|e| AppError::InvalidRequest {
            field: field.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::RateLimited("quota".to_string()).code(),
            "RATE_LIMITED"
        );
        assert_eq!(
            AppError::TodoNotFound("x".to_string()).code(),
            "TODO_NOT_FOUND"
        );
        assert_eq!(AppError::SessionExpired.code(), "SESSION_EXPIRED");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::InvalidRequest {
                field: "input".to_string(),
                reason: "too short".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::RateLimited(String::new()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        // Missing credential is surfaced as a 500, matching the original
        // endpoint contract rather than a 503.
        assert_eq!(
            AppError::ServiceUnavailable("no key".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::MalformedModelOutput("bad date".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::SessionExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_provider_detail_never_leaks() {
        let err = AppError::InferenceFailed;
        let resp = err.to_response();
        assert_eq!(resp.code, "INFERENCE_FAILED");
        assert!(!resp.message.is_empty());
        assert!(resp.details.is_none());
    }
}
