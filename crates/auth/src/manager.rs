//! Access-token lifecycle: cached reads, single-attempt refresh.

use crate::{codex, gemini, iflow};
use std::sync::Arc;
use std::time::Duration;
use subgate_types::{GateError, OAuthToken, ProviderId, traits::Result, traits::TokenStore};

const REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Token endpoint URLs, overridable so tests can point at a local mock.
#[derive(Debug, Clone)]
pub struct TokenEndpoints {
    pub codex: String,
    pub gemini: String,
    pub iflow: String,
}

impl Default for TokenEndpoints {
    fn default() -> Self {
        Self {
            codex: codex::TOKEN_URL.to_string(),
            gemini: gemini::TOKEN_URL.to_string(),
            iflow: iflow::TOKEN_URL.to_string(),
        }
    }
}

impl TokenEndpoints {
    fn for_provider(&self, provider: &ProviderId) -> &str {
        match provider {
            ProviderId::Codex => &self.codex,
            ProviderId::Gemini => &self.gemini,
            ProviderId::IFlow => &self.iflow,
        }
    }
}

/// Serves fresh access tokens to the adapters.
///
/// One instance is shared across the process; all per-provider state lives
/// in the store. Concurrent refreshes for the same provider race and the
/// last write wins.
pub struct AuthManager {
    store: Arc<dyn TokenStore>,
    http: reqwest::Client,
    gemini_client_id: String,
    gemini_client_secret: String,
    endpoints: TokenEndpoints,
}

impl AuthManager {
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            http: reqwest::Client::new(),
            gemini_client_id: String::new(),
            gemini_client_secret: String::new(),
            endpoints: TokenEndpoints::default(),
        }
    }

    /// Sets the Google OAuth client credentials used for gemini exchange
    /// and refresh.
    #[must_use]
    pub fn with_gemini_client(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.gemini_client_id = client_id.into();
        self.gemini_client_secret = client_secret.into();
        self
    }

    /// Overrides the token endpoints (tests).
    #[must_use]
    pub fn with_endpoints(mut self, endpoints: TokenEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub(crate) fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn gemini_client(&self) -> (&str, &str) {
        (&self.gemini_client_id, &self.gemini_client_secret)
    }

    /// Removes the stored credential for a provider.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Storage`] if the store cannot delete the record.
    pub async fn logout(&self, provider: &ProviderId) -> Result<()> {
        self.store.remove(provider).await
    }

    /// Returns the stored token without refreshing, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Storage`] on store failure.
    pub async fn peek(&self, provider: &ProviderId) -> Result<Option<OAuthToken>> {
        self.store.load(provider).await
    }

    /// Persists a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Storage`] on store failure.
    pub async fn put(&self, provider: &ProviderId, token: &OAuthToken) -> Result<()> {
        self.store.save(provider, token).await
    }

    /// Returns a usable access token, refreshing a stale one first.
    ///
    /// # Errors
    ///
    /// [`GateError::TokenNotFound`] when nothing is stored;
    /// [`GateError::RefreshFailed`] when the token is stale and the single
    /// refresh attempt fails (the stale record is deleted so the next call
    /// tells the operator to log in again).
    pub async fn get_token(&self, provider: &ProviderId) -> Result<OAuthToken> {
        let token = self
            .store
            .load(provider)
            .await?
            .ok_or_else(|| GateError::TokenNotFound(provider.clone()))?;

        if !token.is_expired() {
            return Ok(token);
        }

        tracing::info!(provider = %provider, "access token stale, refreshing");
        match self.refresh(provider, &token).await {
            Ok(fresh) => {
                let merged = token.merged_with(fresh);
                self.store.save(provider, &merged).await?;
                Ok(merged)
            }
            Err(err) => {
                tracing::warn!(provider = %provider, %err, "refresh failed, clearing credential");
                self.store.remove(provider).await?;
                Err(GateError::RefreshFailed(provider.clone()))
            }
        }
    }

    async fn refresh(&self, provider: &ProviderId, token: &OAuthToken) -> Result<OAuthToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| GateError::Auth("no refresh token stored".into()))?;

        let endpoint = self.endpoints.for_provider(provider);
        let request = match provider {
            ProviderId::Codex => self
                .http
                .post(endpoint)
                .form(&codex::refresh_form_params(refresh_token)),
            ProviderId::Gemini => self.http.post(endpoint).form(&gemini::refresh_form_params(
                &self.gemini_client_id,
                &self.gemini_client_secret,
                refresh_token,
            )),
            ProviderId::IFlow => self
                .http
                .post(endpoint)
                .header("authorization", iflow::basic_auth_header())
                .form(&iflow::refresh_form_params(refresh_token)),
        };

        let response = tokio::time::timeout(REFRESH_TIMEOUT, request.send())
            .await
            .map_err(|_| GateError::Timeout("token refresh".into()))??;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await?;
        match provider {
            ProviderId::Codex => codex::parse_token_response(&json),
            ProviderId::Gemini => gemini::parse_token_response(&json),
            ProviderId::IFlow => iflow::parse_token_response(&json),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, routing::post};
    use subgate_store::InMemoryTokenStore;

    fn stale_token() -> OAuthToken {
        let mut t = OAuthToken::new("old-access").with_refresh("old-refresh");
        t.expires_at = Some(1);
        t
    }

    async fn mock_token_endpoint(body: serde_json::Value, status: u16) -> String {
        let app = Router::new().route(
            "/token",
            post(move || {
                let body = body.clone();
                async move { (axum::http::StatusCode::from_u16(status).unwrap(), Json(body)) }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/token")
    }

    fn manager_with_endpoint(store: Arc<InMemoryTokenStore>, url: String) -> AuthManager {
        let endpoints = TokenEndpoints {
            codex: url.clone(),
            gemini: url.clone(),
            iflow: url,
        };
        AuthManager::new(store)
            .with_gemini_client("id", "secret")
            .with_endpoints(endpoints)
    }

    #[tokio::test]
    async fn test_missing_token_is_not_found() {
        let store = Arc::new(InMemoryTokenStore::new());
        let manager = AuthManager::new(store);
        let err = manager.get_token(&ProviderId::Codex).await.unwrap_err();
        assert!(matches!(err, GateError::TokenNotFound(ProviderId::Codex)));
    }

    #[tokio::test]
    async fn test_valid_token_returned_without_refresh() {
        let store = Arc::new(InMemoryTokenStore::new());
        let token = OAuthToken::new("fresh").with_expiry(3600);
        store.save(&ProviderId::Codex, &token).await.unwrap();

        let manager = AuthManager::new(store);
        let got = manager.get_token(&ProviderId::Codex).await.unwrap();
        assert_eq!(got.access_token, "fresh");
    }

    #[tokio::test]
    async fn test_token_without_expiry_never_refreshes() {
        let store = Arc::new(InMemoryTokenStore::new());
        store
            .save(&ProviderId::IFlow, &OAuthToken::new("eternal"))
            .await
            .unwrap();
        let manager = AuthManager::new(store);
        let got = manager.get_token(&ProviderId::IFlow).await.unwrap();
        assert_eq!(got.access_token, "eternal");
    }

    #[tokio::test]
    async fn test_stale_token_refreshed_and_persisted() {
        let url = mock_token_endpoint(
            serde_json::json!({"access_token": "new-access", "expires_in": 3600}),
            200,
        )
        .await;
        let store = Arc::new(InMemoryTokenStore::new());
        store.save(&ProviderId::Codex, &stale_token()).await.unwrap();

        let manager = manager_with_endpoint(store.clone(), url);
        let got = manager.get_token(&ProviderId::Codex).await.unwrap();
        assert_eq!(got.access_token, "new-access");
        // refresh token not rotated, old one kept
        assert_eq!(got.refresh_token.as_deref(), Some("old-refresh"));

        let stored = store.load(&ProviderId::Codex).await.unwrap().unwrap();
        assert_eq!(stored.access_token, "new-access");
    }

    #[tokio::test]
    async fn test_refresh_rotates_refresh_token() {
        let url = mock_token_endpoint(
            serde_json::json!({
                "access_token": "new-access",
                "refresh_token": "new-refresh",
                "expires_in": 3600,
            }),
            200,
        )
        .await;
        let store = Arc::new(InMemoryTokenStore::new());
        store.save(&ProviderId::Gemini, &stale_token()).await.unwrap();

        let manager = manager_with_endpoint(store, url);
        let got = manager.get_token(&ProviderId::Gemini).await.unwrap();
        assert_eq!(got.refresh_token.as_deref(), Some("new-refresh"));
    }

    #[tokio::test]
    async fn test_failed_refresh_deletes_record() {
        let url = mock_token_endpoint(
            serde_json::json!({"error": "invalid_grant"}),
            400,
        )
        .await;
        let store = Arc::new(InMemoryTokenStore::new());
        store.save(&ProviderId::Codex, &stale_token()).await.unwrap();

        let manager = manager_with_endpoint(store.clone(), url);
        let err = manager.get_token(&ProviderId::Codex).await.unwrap_err();
        assert!(matches!(err, GateError::RefreshFailed(ProviderId::Codex)));
        assert!(store.load(&ProviderId::Codex).await.unwrap().is_none());

        // next call reports not-found, pointing the operator at login
        let err = manager.get_token(&ProviderId::Codex).await.unwrap_err();
        assert!(matches!(err, GateError::TokenNotFound(_)));
    }

    #[tokio::test]
    async fn test_stale_without_refresh_token_deletes_record() {
        let store = Arc::new(InMemoryTokenStore::new());
        let mut t = OAuthToken::new("old");
        t.expires_at = Some(1);
        store.save(&ProviderId::IFlow, &t).await.unwrap();

        let manager = AuthManager::new(store.clone());
        let err = manager.get_token(&ProviderId::IFlow).await.unwrap_err();
        assert!(matches!(err, GateError::RefreshFailed(ProviderId::IFlow)));
        assert!(store.load(&ProviderId::IFlow).await.unwrap().is_none());
    }
}
