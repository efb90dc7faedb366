//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` covering the storefront's error taxonomy.
//! All route handlers return `Result<T, AppError>`; every error is converted
//! to a structured JSON message at the request boundary, and server-side
//! failures are captured to Sentry first. Internal identifiers and query
//! details never reach the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input fields; recoverable, surfaced verbatim.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Cart references a product or size that is no longer valid. The
    /// client should re-fetch the cart before retrying.
    #[error("Invalid cart state: {0}")]
    InvalidCartState(String),

    /// Order lookup exceeded the hourly attempt cap.
    #[error("Rate limited")]
    RateLimited,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("token serialization failed: {err}"))
    }
}

/// JSON error body returned to the client.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCartState(_) => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Recoverable errors are surfaced verbatim; everything else gets a
        // generic message.
        let message = match &self {
            Self::Validation(msg) | Self::InvalidCartState(msg) | Self::NotFound(msg) => {
                msg.clone()
            }
            Self::RateLimited => "Too many tries. Please try again later.".to_string(),
            Self::Database(_) | Self::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
