//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, info};

/// definitions for the storylens application.
#[derive(Debug)]
pub enum StoryLensError {
    /// A required field was missing or invalid
    BadRequest(String),
    /// Upload exceeded the configured size limit
    PayloadTooLarge,
    /// When a requested story or file is not found
    NotFound(String),
    /// When local I/O fails or something unexpected happens
    Internal {
        /// Generic caller-facing message
        message: &'static str,
        /// Underlying failure detail
        details: String,
    },
}

impl StoryLensError {
    /// Internal error with the generic message
    pub fn internal(details: impl ToString) -> Self {
        StoryLensError::Internal {
            message: "Internal server error",
            details: details.to_string(),
        }
    }
}

impl From<std::io::Error> for StoryLensError {
    fn from(err: std::io::Error) -> Self {
        StoryLensError::internal(err)
    }
}

impl From<axum::http::Error> for StoryLensError {
    fn from(err: axum::http::Error) -> Self {
        StoryLensError::internal(err)
    }
}

impl IntoResponse for StoryLensError {
    fn into_response(self) -> axum::response::Response {
        match self {
            StoryLensError::BadRequest(message) => {
                info!("Bad request: {}", message);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            StoryLensError::PayloadTooLarge => {
                info!("Upload rejected: file too large");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "File too large" })),
                )
                    .into_response()
            }
            StoryLensError::NotFound(message) => {
                info!("404 {}", message);
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            StoryLensError::Internal { message, details } => {
                error!("{}: {}", message, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message, "details": details })),
                )
                    .into_response()
            }
        }
    }
}
