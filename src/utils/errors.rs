//! Application error handling
//!
//! Every error the service can surface is a variant here; conversion to the
//! uniform `{success:false, error, code}` envelope happens in one place via
//! `IntoResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by the dispatch API
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Requested transition is invalid for the entity's current state.
    /// Always rejected, never coerced.
    #[error("State conflict: {0}")]
    StateConflict(String),

    /// Tracking token that was never issued. Kept distinct from
    /// `TokenExpired` so clients can show "never existed" vs "expired".
    #[error("Invalid tracking token")]
    TokenInvalid,

    #[error("Tracking token expired")]
    TokenExpired,

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body matching the success envelope (`ApiResponse`) shape
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl ErrorResponse {
    fn new(message: String, code: &str) -> Self {
        Self {
            success: false,
            error: message,
            code: Some(code.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Database(e) => {
                // SQL detail stays server-side
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "An error occurred while accessing the database".to_string(),
                        "DB_ERROR",
                    ),
                )
            }

            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(msg, "VALIDATION_ERROR"),
            ),

            AppError::Unauthorized(msg) => {
                warn!("unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, ErrorResponse::new(msg, "UNAUTHORIZED"))
            }

            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::new(msg, "NOT_FOUND")),

            AppError::StateConflict(msg) => {
                warn!("rejected transition: {}", msg);
                (StatusCode::CONFLICT, ErrorResponse::new(msg, "STATE_CONFLICT"))
            }

            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Invalid tracking token".to_string(), "TOKEN_INVALID"),
            ),

            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::new("Tracking token expired".to_string(), "TOKEN_EXPIRED"),
            ),

            AppError::Jwt(msg) => {
                warn!("jwt error: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Invalid or expired session token".to_string(), "JWT_ERROR"),
                )
            }

            AppError::Internal(msg) => {
                error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An unexpected error occurred".to_string(), "INTERNAL_ERROR"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;
