//! Pass-through adapter — forwards canonical requests to Anthropic as-is.
//!
//! No managed credential: the caller's own `x-api-key` or `authorization`
//! header rides along. Bodies and stream bytes are untouched in both
//! directions; dropping the response stream aborts the upstream connection.

use crate::http_util::ProviderHttp;
use async_trait::async_trait;
use subgate_types::{
    ChatRequest, GateError,
    traits::{AdapterResponse, CallerCredential, ProviderAdapter, Result},
};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Fallback adapter for models no managed provider claims.
pub struct PassthroughAdapter {
    http: ProviderHttp,
    base_url: String,
}

impl PassthroughAdapter {
    #[must_use]
    pub fn new(http: ProviderHttp) -> Self {
        Self {
            http,
            base_url: API_URL.to_string(),
        }
    }

    /// Overrides the upstream URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl ProviderAdapter for PassthroughAdapter {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    /// The pass-through accepts any model; it sits last in the router.
    fn supports(&self, _model: &str) -> bool {
        true
    }

    fn models(&self) -> Vec<String> {
        Vec::new()
    }

    async fn handle(
        &self,
        request: ChatRequest,
        caller: Option<&CallerCredential>,
    ) -> Result<AdapterResponse> {
        let caller = caller.ok_or_else(|| {
            GateError::Auth(
                "no upstream credential: send x-api-key or authorization for this model".into(),
            )
        })?;

        let body = request.to_body()?;
        let resp = self
            .http
            .send(
                self.http
                    .client()
                    .post(&self.base_url)
                    .header(caller.header, &caller.value)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body),
            )
            .await?;

        if request.stream {
            Ok(AdapterResponse::Stream(ProviderHttp::byte_stream(resp)))
        } else {
            let json: serde_json::Value = resp.json().await?;
            Ok(AdapterResponse::Complete(json))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::Request, routing::post};
    use serde_json::json;
    use std::time::Duration;

    fn request(model: &str) -> ChatRequest {
        serde_json::from_value(json!({
            "model": model,
            "messages": [{"role": "user", "content": "hi"}],
            "max_tokens": 16,
        }))
        .unwrap()
    }

    #[test]
    fn test_supports_everything() {
        let adapter = PassthroughAdapter::new(ProviderHttp::new(Duration::from_secs(5)));
        assert!(adapter.supports("claude-sonnet-4"));
        assert!(adapter.supports("anything-at-all"));
    }

    #[tokio::test]
    async fn test_missing_caller_credential_is_auth_error() {
        let adapter = PassthroughAdapter::new(ProviderHttp::new(Duration::from_secs(5)));
        let err = adapter
            .handle(request("claude-sonnet-4"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Auth(_)));
    }

    #[tokio::test]
    async fn test_forwards_body_and_credential() {
        let app = Router::new().route(
            "/v1/messages",
            post(|req: Request| async move {
                let (parts, body) = req.into_parts();
                let key = parts
                    .headers
                    .get("x-api-key")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
                let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
                Json(json!({"echo_key": key, "echo_model": body["model"]}))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let adapter = PassthroughAdapter::new(ProviderHttp::new(Duration::from_secs(5)))
            .with_base_url(format!("http://{addr}/v1/messages"));
        let cred = CallerCredential {
            header: "x-api-key",
            value: "sk-mykey".into(),
        };
        let AdapterResponse::Complete(body) = adapter
            .handle(request("claude-sonnet-4"), Some(&cred))
            .await
            .unwrap()
        else {
            panic!("expected complete response");
        };
        assert_eq!(body["echo_key"], "sk-mykey");
        assert_eq!(body["echo_model"], "claude-sonnet-4");
    }
}
