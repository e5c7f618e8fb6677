//! HTTP error mapping
//!
//! Validation failures become `400` with an `error` message the client can
//! show. Everything else is logged server-side and answered with a `500`
//! carrying a generic per-endpoint `message`, never the underlying cause.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shopboard_core::CoreError;
use tracing::error;

/// Message returned for a rejected `period` parameter
pub const INVALID_PERIOD: &str = "Invalid period. Use daily, weekly, or monthly.";

#[derive(Debug)]
pub enum ApiError {
    /// Client supplied an unusable parameter
    BadRequest(&'static str),
    /// Aggregation failed; the string is the endpoint's public message
    Internal(&'static str),
}

impl ApiError {
    /// Map a core error for the endpoint answering with `message` on failure
    pub fn from_core(err: CoreError, message: &'static str) -> Self {
        match err {
            CoreError::InvalidPeriod { .. } => ApiError::BadRequest(INVALID_PERIOD),
            err => {
                error!(error = ?err, "{message}");
                ApiError::Internal(message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
            }
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": message })),
            )
                .into_response(),
        }
    }
}

/// Attach an endpoint's failure message to a core result
pub trait ApiResultExt<T> {
    fn or_api(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> ApiResultExt<T> for shopboard_core::error::Result<T> {
    fn or_api(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|err| ApiError::from_core(err, message))
    }
}
