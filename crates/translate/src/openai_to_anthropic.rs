//! OpenAI chat-completions → canonical response mapping.

use crate::common::map_openai_finish;
use crate::message_id;
use serde_json::{Value, json};
use subgate_types::{traits::ResponseTranslator, traits::Result};

/// Maps a complete OpenAI-format response to the canonical message shape.
pub struct OpenAiResponseTranslator {
    /// Model name echoed back to the caller (the one they asked for).
    model_hint: String,
}

impl OpenAiResponseTranslator {
    #[must_use]
    pub fn new(model_hint: impl Into<String>) -> Self {
        Self {
            model_hint: model_hint.into(),
        }
    }
}

impl ResponseTranslator for OpenAiResponseTranslator {
    fn translate_response(&self, response: &Value) -> Result<Value> {
        let choice = response
            .get("choices")
            .and_then(|c| c.get(0))
            .cloned()
            .unwrap_or(Value::Null);
        let text = choice
            .pointer("/message/content")
            .and_then(Value::as_str)
            .unwrap_or("");
        let stop_reason =
            map_openai_finish(choice.get("finish_reason").and_then(Value::as_str));

        let id = response
            .get("id")
            .and_then(Value::as_str)
            .map_or_else(message_id, ToString::to_string);
        let input_tokens = response
            .pointer("/usage/prompt_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let output_tokens = response
            .pointer("/usage/completion_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Ok(json!({
            "id": id,
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
            "model": self.model_hint,
            "stop_reason": stop_reason,
            "stop_sequence": null,
            "usage": {"input_tokens": input_tokens, "output_tokens": output_tokens},
        }))
    }
}
