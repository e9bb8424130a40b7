//! In-memory token store for tests and ephemeral sessions.

use async_trait::async_trait;
use std::collections::HashMap;
use subgate_types::{OAuthToken, ProviderId, traits::Result, traits::TokenStore};
use tokio::sync::RwLock;

/// Volatile token store; contents are lost on drop.
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<ProviderId, OAuthToken>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self, provider: &ProviderId) -> Result<Option<OAuthToken>> {
        Ok(self.tokens.read().await.get(provider).cloned())
    }

    async fn save(&self, provider: &ProviderId, token: &OAuthToken) -> Result<()> {
        self.tokens
            .write()
            .await
            .insert(provider.clone(), token.clone());
        Ok(())
    }

    async fn remove(&self, provider: &ProviderId) -> Result<()> {
        self.tokens.write().await.remove(provider);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_load_remove() {
        let store = InMemoryTokenStore::new();
        let provider = ProviderId::Codex;

        assert!(store.load(&provider).await.unwrap().is_none());

        let token = OAuthToken::new("tok").with_refresh("ref");
        store.save(&provider, &token).await.unwrap();
        assert_eq!(store.load(&provider).await.unwrap(), Some(token));

        store.remove(&provider).await.unwrap();
        assert!(store.load(&provider).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let store = InMemoryTokenStore::new();
        store.remove(&ProviderId::IFlow).await.unwrap();
    }

    #[tokio::test]
    async fn test_providers_are_isolated() {
        let store = InMemoryTokenStore::new();
        store
            .save(&ProviderId::Codex, &OAuthToken::new("a"))
            .await
            .unwrap();
        assert!(store.load(&ProviderId::Gemini).await.unwrap().is_none());
    }
}
