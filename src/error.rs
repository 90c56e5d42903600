// HTTP error type shared by all resource handlers

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Handler-level failure. The variant picks the status code; the message is
/// written verbatim as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body or query string could not be bound or failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// Inspect-by-id failed.
    #[error("{0}")]
    NotFound(String),

    /// Any other service failure.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Inspect failures are reported as 404 regardless of cause.
    pub fn not_found(err: anyhow::Error) -> Self {
        Self::NotFound(format!("{:#}", err))
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(format!("{:#}", err))
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected ({}): {}", status, self);
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
