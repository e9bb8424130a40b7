//! Upstream provider adapters.
//!
//! Each adapter pairs an OAuth credential (or the caller's own, for the
//! pass-through) with the translators that map between the canonical
//! protocol and the provider's native one. [`AdapterRouter`] picks the
//! adapter for a request from its model string.

pub mod codex;
pub mod gemini;
pub mod http_util;
pub mod iflow;
pub mod passthrough;
pub mod router;
pub mod stream;

pub use codex::CodexAdapter;
pub use gemini::GeminiAdapter;
pub use http_util::ProviderHttp;
pub use iflow::IFlowAdapter;
pub use passthrough::PassthroughAdapter;
pub use router::AdapterRouter;
