//! `POST /v1/messages` — the canonical chat endpoint.

use crate::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subgate_types::{ChatRequest, traits::AdapterResponse, traits::CallerCredential};

/// Pulls the caller's own upstream credential out of the request headers,
/// `x-api-key` preferred over `authorization`.
fn caller_credential(headers: &HeaderMap) -> Option<CallerCredential> {
    for name in ["x-api-key", "authorization"] {
        if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
            return Some(CallerCredential {
                header: if name == "x-api-key" {
                    "x-api-key"
                } else {
                    "authorization"
                },
                value: value.to_string(),
            });
        }
    }
    None
}

/// Routes the request to an adapter and relays the result.
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let adapter = state.router.select(&request.model);
    tracing::info!(model = %request.model, adapter = adapter.name(), stream = request.stream, "routing request");

    let caller = caller_credential(&headers);
    match adapter.handle(request, caller.as_ref()).await? {
        AdapterResponse::Complete(body) => Ok(Json(body).into_response()),
        AdapterResponse::Stream(stream) => {
            let response = Response::builder()
                .header(header::CONTENT_TYPE, "text/event-stream")
                .header(header::CACHE_CONTROL, "no-cache")
                .header("x-accel-buffering", "no")
                .body(Body::from_stream(stream))
                .map_err(|e| subgate_types::GateError::Http(e.to_string()))?;
            Ok(response)
        }
    }
}
