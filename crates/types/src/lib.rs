//! Shared types for the subgate workspace.
//!
//! Every cross-crate type and abstraction lives here so that higher layers
//! depend only on `subgate-types`, not on each other.

pub mod chat;
pub mod error;
pub mod provider;
pub mod stream;
pub mod token;
pub mod traits;

pub use chat::ChatRequest;
pub use error::{GateError, Result};
pub use provider::ProviderId;
pub use stream::StreamEvent;
pub use token::{OAuthToken, TokenState};
pub use traits::{
    AdapterResponse, ByteStream, CallerCredential, ProviderAdapter, RequestTranslator,
    ResponseTranslator, StreamTranslator, TokenStore,
};
