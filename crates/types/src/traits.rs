//! Cross-crate trait seams: credential storage, translation, adapters.

use crate::{ChatRequest, OAuthToken, ProviderId, StreamEvent};
use async_trait::async_trait;
use bytes::Bytes;
use futures_core::Stream;
use serde_json::Value;
use std::pin::Pin;

pub use crate::error::Result;

/// A pinned, boxed stream of byte chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Persistent credential storage keyed by provider.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the stored token, `Ok(None)` when no record exists.
    async fn load(&self, provider: &ProviderId) -> Result<Option<OAuthToken>>;

    /// Persists (creates or replaces) the token.
    async fn save(&self, provider: &ProviderId, token: &OAuthToken) -> Result<()>;

    /// Deletes the stored record. Deleting a missing record is not an error.
    async fn remove(&self, provider: &ProviderId) -> Result<()>;
}

/// Maps a canonical request body into a provider-native one. Pure.
pub trait RequestTranslator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GateError::Translation`] for shapes the target protocol
    /// cannot express.
    fn translate_request(&self, request: &ChatRequest) -> Result<Value>;
}

/// Maps a complete provider-native response body back to canonical. Pure.
pub trait ResponseTranslator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GateError::Translation`] when the response is missing the
    /// fields the canonical shape requires.
    fn translate_response(&self, response: &Value) -> Result<Value>;
}

/// Incremental stream re-encoder: provider-native SSE bytes in, canonical
/// [`StreamEvent`]s out.
///
/// Implementations carry their parse state (pending bytes, whether the
/// terminal frames were emitted) across calls, so callers may feed bytes in
/// arbitrary chunk splits.
pub trait StreamTranslator: Send {
    /// Events emitted before any upstream bytes arrive
    /// (`message_start`, `content_block_start`).
    fn begin(&mut self) -> Vec<StreamEvent>;

    /// Consume one chunk of upstream bytes, returning any events it
    /// completes. Malformed payload lines are logged and skipped.
    fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent>;

    /// Called once after the upstream closes. Emits the terminal frames if
    /// the upstream ended without signaling a finish reason; empty
    /// otherwise.
    fn finish(&mut self) -> Vec<StreamEvent>;
}

/// Credential the caller supplied for the pass-through backend.
#[derive(Debug, Clone)]
pub struct CallerCredential {
    /// Header name the credential arrived under (`x-api-key` or
    /// `authorization`).
    pub header: &'static str,
    /// Raw header value, forwarded verbatim.
    pub value: String,
}

/// Outcome of an adapter call.
pub enum AdapterResponse {
    /// Complete canonical JSON response body.
    Complete(Value),
    /// Stream of canonical SSE frame bytes.
    Stream(ByteStream),
}

/// One upstream backend: a capability predicate plus a request handler.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Human-readable backend name, used in logs and the model catalog.
    fn name(&self) -> &'static str;

    /// Whether this adapter claims the given model string. Pure.
    fn supports(&self, model: &str) -> bool;

    /// Model identifiers this adapter advertises in the catalog.
    fn models(&self) -> Vec<String>;

    /// Executes the request against the upstream.
    ///
    /// # Errors
    ///
    /// Any [`GateError`] from auth, translation, or the upstream call.
    async fn handle(
        &self,
        request: ChatRequest,
        caller: Option<&CallerCredential>,
    ) -> Result<AdapterResponse>;
}

impl std::fmt::Debug for AdapterResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete(v) => f.debug_tuple("Complete").field(v).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
