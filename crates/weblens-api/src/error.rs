//! API error types.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use weblens_core::TrackerError;

/// Message returned for every failure that is not the client's fault.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or incomplete request.
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeds the configured limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Referenced website or snapshot does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The URL is already tracked by another website.
    #[error("{message}")]
    Conflict { message: String, website_id: String },

    /// Storage or runtime failure. The cause is logged, never returned.
    #[error("Server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(message) => Self::BadRequest(message),
            TrackerError::NotFound(message) => Self::NotFound(message),
            TrackerError::Store(e) => Self::Internal(e.to_string()),
            TrackerError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(rejection.body_text())
        } else {
            Self::BadRequest(rejection.body_text())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::BadRequest(message)
            | Self::PayloadTooLarge(message)
            | Self::NotFound(message) => json!({ "error": message }),
            Self::Conflict {
                message,
                website_id,
            } => json!({ "error": message, "websiteId": website_id }),
            Self::Internal(cause) => {
                error!("Request failed: {}", cause);
                json!({ "error": SERVER_ERROR_MESSAGE })
            }
        };
        (status, Json(body)).into_response()
    }
}
