// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use conch_common::ErrorBody;
use thiserror::Error;

use crate::validation::ValidationReport;

/// Application error types; each carries its own HTTP status
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed: {}", .0.messages().join("; "))]
    Validation(ValidationReport),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Error: password is incorrect")]
    InvalidCredentials,

    #[error("{0}")]
    Hashing(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Authentication rate limit exceeded")]
    AuthRateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(report) => report.status(),
            AppError::Conflict(_)
            | AppError::Hashing(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::AuthRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) | AppError::Config(_) | AppError::Io(_) | AppError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::Conflict(_) => "CONFLICT_001",
            AppError::NotFound(_) => "NF_001",
            AppError::Unauthorized(_) => "AUTH_001",
            AppError::InvalidCredentials => "AUTH_002",
            AppError::AuthRateLimited => "AUTH_003",
            AppError::Hashing(_) => "HASH_001",
            AppError::InvalidInput(_) => "VAL_002",
            AppError::Internal(_) => "INT_001",
            AppError::Config(_) => "CFG_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Messages shown to the client.
    ///
    /// Client-facing failures keep their text. Infrastructure failures are
    /// replaced with a generic line outside debug builds.
    pub fn client_messages(&self) -> Vec<String> {
        match self {
            AppError::Validation(report) => report.messages(),
            AppError::AuthRateLimited => {
                vec!["Too many authentication attempts, please try again later".to_string()]
            },
            AppError::Internal(_) | AppError::Config(_) | AppError::Io(_) | AppError::Json(_)
                if !cfg!(debug_assertions) =>
            {
                vec!["An internal server error occurred".to_string()]
            },
            other => vec![other.to_string()],
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }

        let body = ErrorBody {
            status: status.as_u16(),
            messages: self.client_messages(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationReport> for AppError {
    fn from(report: ValidationReport) -> Self {
        AppError::Validation(report)
    }
}
