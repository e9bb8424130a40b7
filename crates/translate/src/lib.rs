//! Pure protocol transpilers.
//!
//! Every function here maps JSON to JSON with no I/O; the provider adapters
//! own the HTTP side. Request translators go canonical → native, response
//! translators go native → canonical, and the stream translators re-encode
//! native SSE bytes into canonical frames incrementally.

pub mod anthropic_to_gemini;
pub mod anthropic_to_openai;
pub mod common;
pub mod gemini_stream;
pub mod gemini_to_anthropic;
pub mod model_map;
pub mod openai_stream;
pub mod openai_to_anthropic;
pub mod schema_clean;
pub mod sse;

pub use anthropic_to_gemini::GeminiRequestTranslator;
pub use anthropic_to_openai::OpenAiRequestTranslator;
pub use gemini_stream::GeminiStreamTranslator;
pub use gemini_to_anthropic::GeminiResponseTranslator;
pub use openai_stream::OpenAiStreamTranslator;
pub use openai_to_anthropic::OpenAiResponseTranslator;

/// Generates a canonical message id.
#[must_use]
pub fn message_id() -> String {
    format!("msg_{}", uuid::Uuid::new_v4().simple())
}
