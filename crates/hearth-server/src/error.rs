//! HTTP error responses.
//!
//! Every failure leaves the API as `{"error": {"code", "message"}}`
//! with a status derived from the [`HearthError`] variant.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hearth_core::error::HearthError;
use serde::Serialize;

static EXPOSE_ERROR_DETAILS: AtomicBool = AtomicBool::new(false);

/// When enabled, 5xx bodies carry the underlying error text instead of
/// a generic message.
pub fn set_expose_error_details(expose: bool) {
    EXPOSE_ERROR_DETAILS.store(expose, Ordering::Relaxed);
}

fn expose_error_details() -> bool {
    EXPOSE_ERROR_DETAILS.load(Ordering::Relaxed)
}

#[derive(Debug)]
pub struct ApiError(pub HearthError);

impl From<HearthError> for ApiError {
    fn from(err: HearthError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            HearthError::Validation { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            HearthError::Unauthenticated { .. } => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            HearthError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            HearthError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            HearthError::Conflict { .. } => (StatusCode::CONFLICT, "CONFLICT"),
            HearthError::InvalidTransition { .. } => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            HearthError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
            HearthError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "UNAVAILABLE"),
            HearthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            tracing::error!(status = %status, code, error = %self.0, "request failed");
            if expose_error_details() {
                self.0.to_string()
            } else {
                "the server could not complete the request".to_string()
            }
        } else {
            self.0.to_string()
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}
