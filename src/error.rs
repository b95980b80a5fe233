//! Unified error types for the habit tracker.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Process-level errors: configuration and startup.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors returned by habit operations.
///
/// Every variant maps onto exactly one HTTP status; the message is what the
/// client sees, except for [`HabitError::Internal`] whose detail is only
/// logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HabitError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// No habit with the requested id.
    #[error("Habit not found")]
    NotFound,

    /// The completion date was already logged for this habit.
    #[error("Completion already logged for this date")]
    Conflict,

    /// Anything unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HabitError {
    /// Status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            HabitError::Validation(_) => StatusCode::BAD_REQUEST,
            HabitError::NotFound => StatusCode::NOT_FOUND,
            HabitError::Conflict => StatusCode::CONFLICT,
            HabitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body.
    pub fn public_message(&self) -> String {
        match self {
            HabitError::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human readable message.
    pub error: String,
}

impl IntoResponse for HabitError {
    fn into_response(self) -> Response {
        if let HabitError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Unhandled error in habit handler");
        }

        let body = ErrorBody {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for habit operations.
pub type HabitResult<T> = std::result::Result<T, HabitError>;
