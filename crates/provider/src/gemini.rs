//! Gemini adapter — Google Generative Language API, native protocol.
//!
//! Non-streaming requests hit `:generateContent`; streaming requests hit
//! `:streamGenerateContent?alt=sse`. The model name rides in the URL, not
//! the body.

use crate::http_util::ProviderHttp;
use crate::stream::frame_stream;
use async_trait::async_trait;
use std::sync::Arc;
use subgate_auth::AuthManager;
use subgate_translate::{
    GeminiRequestTranslator, GeminiResponseTranslator, GeminiStreamTranslator, model_map,
};
use subgate_types::{
    ChatRequest, ProviderId,
    traits::{
        AdapterResponse, CallerCredential, ProviderAdapter, RequestTranslator, ResponseTranslator,
        Result,
    },
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Adapter for the Google Gemini backend.
pub struct GeminiAdapter {
    http: ProviderHttp,
    auth: Arc<AuthManager>,
    translator: GeminiRequestTranslator,
    base_url: String,
}

impl GeminiAdapter {
    #[must_use]
    pub fn new(http: ProviderHttp, auth: Arc<AuthManager>) -> Self {
        Self {
            http,
            auth,
            translator: GeminiRequestTranslator::new(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Overrides the upstream base URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn endpoint(&self, model: &str, stream: bool) -> String {
        if stream {
            format!("{}/{model}:streamGenerateContent?alt=sse", self.base_url)
        } else {
            format!("{}/{model}:generateContent", self.base_url)
        }
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn supports(&self, model: &str) -> bool {
        model.starts_with("gemini-")
    }

    fn models(&self) -> Vec<String> {
        model_map::known_models(&ProviderId::Gemini)
    }

    async fn handle(
        &self,
        request: ChatRequest,
        _caller: Option<&CallerCredential>,
    ) -> Result<AdapterResponse> {
        let token = self.auth.get_token(&ProviderId::Gemini).await?;
        let body = self.translator.translate_request(&request)?;
        let model = model_map::map_model(&ProviderId::Gemini, &request.model);
        let url = self.endpoint(&model, request.stream);

        let resp = self
            .http
            .send(
                self.http
                    .client()
                    .post(&url)
                    .bearer_auth(&token.access_token)
                    .json(&body),
            )
            .await?;

        if request.stream {
            let translator = GeminiStreamTranslator::new(request.model.clone());
            Ok(AdapterResponse::Stream(frame_stream(
                ProviderHttp::byte_stream(resp),
                Box::new(translator),
            )))
        } else {
            let json: serde_json::Value = resp.json().await?;
            let canonical =
                GeminiResponseTranslator::new(request.model.clone()).translate_response(&json)?;
            Ok(AdapterResponse::Complete(canonical))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use subgate_store::InMemoryTokenStore;

    fn adapter() -> GeminiAdapter {
        let auth = Arc::new(AuthManager::new(Arc::new(InMemoryTokenStore::new())));
        GeminiAdapter::new(ProviderHttp::new(Duration::from_secs(5)), auth)
    }

    #[test]
    fn test_supports_gemini_prefix() {
        let a = adapter();
        assert!(a.supports("gemini-2.5-flash"));
        assert!(!a.supports("gpt-5.1"));
    }

    #[test]
    fn test_endpoint_shapes() {
        let a = adapter();
        assert_eq!(
            a.endpoint("gemini-2.5-flash", false),
            format!("{API_BASE}/gemini-2.5-flash:generateContent")
        );
        assert!(
            a.endpoint("gemini-2.5-flash", true)
                .ends_with(":streamGenerateContent?alt=sse")
        );
    }
}
