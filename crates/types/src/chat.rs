//! Canonical chat request shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chat completion request in the canonical (Anthropic Messages) shape.
///
/// Only the fields the gateway inspects are typed; everything else rides in
/// `extra` and is passed through to the translators untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Requested model name. Routing keys off this string.
    pub model: String,
    /// Conversation turns, kept as raw JSON so translators own the shape
    /// rules (string content, block arrays, ...).
    pub messages: Vec<Value>,
    /// Whether the caller wants a server-sent-event stream.
    #[serde(default)]
    pub stream: bool,
    /// All remaining fields (`max_tokens`, `system`, `tools`, sampling
    /// parameters, ...), forwarded only when present.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ChatRequest {
    /// Serializes the request back into a single JSON object, recombining
    /// the flattened extras.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GateError::Serialization`] if serialization fails.
    pub fn to_body(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Fetches an extra field by name.
    #[must_use]
    pub fn extra_field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_minimal() {
        let req: ChatRequest = serde_json::from_value(json!({
            "model": "gpt-5.1-codex",
            "messages": [{"role": "user", "content": "hi"}],
            "max_tokens": 128,
        }))
        .unwrap();
        assert_eq!(req.model, "gpt-5.1-codex");
        assert!(!req.stream);
        assert_eq!(req.extra_field("max_tokens"), Some(&json!(128)));
    }

    #[test]
    fn test_stream_flag() {
        let req: ChatRequest = serde_json::from_value(json!({
            "model": "m",
            "messages": [],
            "stream": true,
        }))
        .unwrap();
        assert!(req.stream);
    }

    #[test]
    fn test_to_body_roundtrip() {
        let original = json!({
            "model": "m",
            "messages": [{"role": "user", "content": "hi"}],
            "stream": false,
            "temperature": 0.5,
        });
        let req: ChatRequest = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(req.to_body().unwrap(), original);
    }
}
