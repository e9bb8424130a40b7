//! Codex adapter — OpenAI chat completions with a Codex OAuth token.

use crate::http_util::ProviderHttp;
use crate::stream::frame_stream;
use async_trait::async_trait;
use std::sync::Arc;
use subgate_auth::AuthManager;
use subgate_translate::{
    OpenAiRequestTranslator, OpenAiResponseTranslator, OpenAiStreamTranslator, model_map,
};
use subgate_types::{
    ChatRequest, ProviderId,
    traits::{
        AdapterResponse, CallerCredential, ProviderAdapter, RequestTranslator, ResponseTranslator,
        Result,
    },
};

const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Adapter for the `OpenAI` (codex) backend.
pub struct CodexAdapter {
    http: ProviderHttp,
    auth: Arc<AuthManager>,
    translator: OpenAiRequestTranslator,
    base_url: String,
}

impl CodexAdapter {
    #[must_use]
    pub fn new(http: ProviderHttp, auth: Arc<AuthManager>) -> Self {
        Self {
            http,
            auth,
            translator: OpenAiRequestTranslator::new(ProviderId::Codex),
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
impl ProviderAdapter for CodexAdapter {
    fn name(&self) -> &'static str {
        "codex"
    }

    fn supports(&self, model: &str) -> bool {
        model.starts_with("gpt-") || model == "o3" || model.starts_with("o3-")
            || model.starts_with("o4") || model.contains("codex")
    }

    fn models(&self) -> Vec<String> {
        model_map::known_models(&ProviderId::Codex)
    }

    async fn handle(
        &self,
        request: ChatRequest,
        _caller: Option<&CallerCredential>,
    ) -> Result<AdapterResponse> {
        let token = self.auth.get_token(&ProviderId::Codex).await?;
        let body = self.translator.translate_request(&request)?;

        let resp = self
            .http
            .send(
                self.http
                    .client()
                    .post(&self.base_url)
                    .bearer_auth(&token.access_token)
                    .json(&body),
            )
            .await?;

        if request.stream {
            let translator = OpenAiStreamTranslator::new(request.model.clone());
            Ok(AdapterResponse::Stream(frame_stream(
                ProviderHttp::byte_stream(resp),
                Box::new(translator),
            )))
        } else {
            let json: serde_json::Value = resp.json().await?;
            let canonical =
                OpenAiResponseTranslator::new(request.model.clone()).translate_response(&json)?;
            Ok(AdapterResponse::Complete(canonical))
        }
    }
}
