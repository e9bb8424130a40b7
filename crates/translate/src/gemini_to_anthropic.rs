//! Gemini `generateContent` → canonical response mapping.

use crate::common::map_gemini_finish;
use crate::message_id;
use serde_json::{Value, json};
use subgate_types::{traits::ResponseTranslator, traits::Result};

/// Maps a complete Gemini response to the canonical message shape.
pub struct GeminiResponseTranslator {
    model_hint: String,
}

impl GeminiResponseTranslator {
    #[must_use]
    pub fn new(model_hint: impl Into<String>) -> Self {
        Self {
            model_hint: model_hint.into(),
        }
    }
}

/// Concatenates the text parts of a candidate's content.
fn candidate_text(candidate: &Value) -> String {
    candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default()
}

impl ResponseTranslator for GeminiResponseTranslator {
    fn translate_response(&self, response: &Value) -> Result<Value> {
        let candidate = response
            .pointer("/candidates/0")
            .cloned()
            .unwrap_or(Value::Null);
        let text = candidate_text(&candidate);
        let stop_reason =
            map_gemini_finish(candidate.get("finishReason").and_then(Value::as_str));

        let input_tokens = response
            .pointer("/usageMetadata/promptTokenCount")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        let output_tokens = response
            .pointer("/usageMetadata/candidatesTokenCount")
            .and_then(Value::as_u64)
            .unwrap_or(0);

        Ok(json!({
            "id": message_id(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normal_response() {
        let upstream = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "hel"}, {"text": "lo"}]},
                "finishReason": "STOP",
            }],
            "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 2},
        });
        let out = GeminiResponseTranslator::new("gemini-2.5-flash")
            .translate_response(&upstream)
            .unwrap();
        assert_eq!(out["content"][0]["text"], "hello");
        assert_eq!(out["stop_reason"], "end_turn");
        assert_eq!(out["model"], "gemini-2.5-flash");
        assert_eq!(out["usage"]["input_tokens"], 7);
        assert_eq!(out["usage"]["output_tokens"], 2);
    }

    #[test]
    fn test_safety_maps_to_refusal() {
        let upstream = json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "SAFETY"}],
        });
        let out = GeminiResponseTranslator::new("m")
            .translate_response(&upstream)
            .unwrap();
        assert_eq!(out["stop_reason"], "refusal");
    }

    #[test]
    fn test_empty_response_defaults() {
        let out = GeminiResponseTranslator::new("m")
            .translate_response(&json!({}))
            .unwrap();
        assert_eq!(out["content"][0]["text"], "");
        assert_eq!(out["stop_reason"], "end_turn");
        assert_eq!(out["usage"]["output_tokens"], 0);
    }
}
