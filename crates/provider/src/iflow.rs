//! iFlow adapter — OpenAI-format chat completions for GLM/Kimi models.

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

const API_URL: &str = "https://apis.iflow.cn/v1/chat/completions";

/// Adapter for the iFlow (Z.ai / GLM) backend.
pub struct IFlowAdapter {
    http: ProviderHttp,
    auth: Arc<AuthManager>,
    translator: OpenAiRequestTranslator,
    base_url: String,
}

impl IFlowAdapter {
    #[must_use]
    pub fn new(http: ProviderHttp, auth: Arc<AuthManager>) -> Self {
        Self {
            http,
            auth,
            translator: OpenAiRequestTranslator::new(ProviderId::IFlow),
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
impl ProviderAdapter for IFlowAdapter {
    fn name(&self) -> &'static str {
        "iflow"
    }

    fn supports(&self, model: &str) -> bool {
        model.starts_with("glm-") || model.starts_with("iflow-")
    }

    fn models(&self) -> Vec<String> {
        model_map::known_models(&ProviderId::IFlow)
    }

    async fn handle(
        &self,
        request: ChatRequest,
        _caller: Option<&CallerCredential>,
    ) -> Result<AdapterResponse> {
        let token = self.auth.get_token(&ProviderId::IFlow).await?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use subgate_store::InMemoryTokenStore;

    #[test]
    fn test_supports_glm_prefix() {
        let auth = Arc::new(AuthManager::new(Arc::new(InMemoryTokenStore::new())));
        let adapter = IFlowAdapter::new(ProviderHttp::new(Duration::from_secs(5)), auth);
        assert!(adapter.supports("glm-4.5"));
        assert!(adapter.supports("iflow-chat"));
        assert!(!adapter.supports("gpt-5.1"));
        assert!(!adapter.supports("kimi-k2"));
    }

    #[test]
    fn test_models_catalog() {
        let auth = Arc::new(AuthManager::new(Arc::new(InMemoryTokenStore::new())));
        let adapter = IFlowAdapter::new(ProviderHttp::new(Duration::from_secs(5)), auth);
        assert!(adapter.models().contains(&"glm-4.5".to_string()));
    }
}
