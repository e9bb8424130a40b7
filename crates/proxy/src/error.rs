//! Error-to-HTTP mapping in the canonical error envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use subgate_types::GateError;

/// Wrapper turning a [`GateError`] into a canonical error response:
/// `{"type":"error","error":{"type":...,"message":...}}`.
pub struct ApiError(pub GateError);

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        Self(err)
    }
}

/// Maps the error taxonomy to an HTTP status and canonical error type.
#[must_use]
pub fn status_and_type(err: &GateError) -> (StatusCode, &'static str) {
    match err {
        GateError::Auth(_) | GateError::TokenNotFound(_) | GateError::RefreshFailed(_) => {
            (StatusCode::UNAUTHORIZED, "authentication_error")
        }
        GateError::Translation(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
        GateError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "api_error"),
        GateError::Upstream { status, .. } => match *status {
            429 => (StatusCode::TOO_MANY_REQUESTS, "rate_limit_error"),
            401 => (StatusCode::UNAUTHORIZED, "authentication_error"),
            403 => (StatusCode::FORBIDDEN, "permission_error"),
            _ => (StatusCode::BAD_GATEWAY, "api_error"),
        },
        GateError::Http(_) => (StatusCode::BAD_GATEWAY, "api_error"),
        GateError::Serialization(_) | GateError::Storage(_) | GateError::Config(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "api_error")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = status_and_type(&self.0);
        tracing::debug!(%status, error = %self.0, "request failed");
        let body = json!({
            "type": "error",
            "error": {"type": error_type, "message": self.0.to_string()},
        });
        (status, Json(body)).into_response()
    }
}
