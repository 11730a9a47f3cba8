use crate::error::SiteError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// JSON error body `{success: false, error}` with a status derived from the cause.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<SiteError> for ApiError {
    fn from(err: SiteError) -> Self {
        let status = match &err {
            SiteError::Validation(_) => StatusCode::BAD_REQUEST,
            SiteError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %err, "request failed");
        }
        let message = match err {
            SiteError::Validation(msg) => msg,
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"success": false, "error": self.message}))).into_response()
    }
}
