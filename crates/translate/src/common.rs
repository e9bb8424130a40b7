//! Shared canonical-side helpers: content flattening, system extraction,
//! finish-reason tables.

use serde_json::Value;
use subgate_types::{ChatRequest, GateError, traits::Result};

/// Reduces a canonical `content` value to plain text.
///
/// Strings pass through verbatim. Block arrays are reduced to their `text`
/// blocks joined with newlines; non-text blocks are dropped silently.
///
/// # Errors
///
/// Returns [`GateError::Translation`] for any other shape.
pub fn flatten_content(content: &Value) -> Result<String> {
    match content {
        Value::String(s) => Ok(s.clone()),
        Value::Array(blocks) => {
            let texts: Vec<&str> = blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect();
            Ok(texts.join("\n"))
        }
        other => Err(GateError::Translation(format!(
            "unsupported content shape: {other}"
        ))),
    }
}

/// Extracts the system prompt from a request: either a string or an array
/// of text blocks joined with newlines. `None` when absent.
///
/// # Errors
///
/// Returns [`GateError::Translation`] for an unsupported `system` shape.
pub fn system_text(request: &ChatRequest) -> Result<Option<String>> {
    match request.extra_field("system") {
        None | Some(Value::Null) => Ok(None),
        Some(v) => flatten_content(v).map(Some).map_err(|_| {
            GateError::Translation("system must be a string or an array of text blocks".into())
        }),
    }
}

/// Copies the optional sampling parameters that are actually present on the
/// request into `dst` under the given target keys.
pub fn copy_present_params(request: &ChatRequest, dst: &mut serde_json::Map<String, Value>, keys: &[(&str, &str)]) {
    for (src, target) in keys {
        if let Some(v) = request.extra_field(src) {
            dst.insert((*target).to_string(), v.clone());
        }
    }
}

/// Maps an OpenAI-format finish reason to a canonical stop reason.
/// Unknown reasons collapse to `end_turn`.
#[must_use]
pub fn map_openai_finish(reason: Option<&str>) -> &'static str {
    match reason {
        Some("length") => "max_tokens",
        Some("tool_calls" | "function_call") => "tool_use",
        Some("content_filter") => "refusal",
        _ => "end_turn",
    }
}

/// Maps a Gemini finish reason to a canonical stop reason.
/// Unknown reasons collapse to `end_turn`.
#[must_use]
pub fn map_gemini_finish(reason: Option<&str>) -> &'static str {
    match reason {
        Some("MAX_TOKENS") => "max_tokens",
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT") => "refusal",
        _ => "end_turn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn req(v: Value) -> ChatRequest {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_flatten_string_verbatim() {
        assert_eq!(flatten_content(&json!("hi there")).unwrap(), "hi there");
    }

    #[test]
    fn test_flatten_blocks_joined_in_order() {
        let content = json!([
            {"type": "text", "text": "first"},
            {"type": "image", "source": {}},
            {"type": "text", "text": "second"},
        ]);
        assert_eq!(flatten_content(&content).unwrap(), "first\nsecond");
    }

    #[test]
    fn test_flatten_rejects_number() {
        assert!(flatten_content(&json!(42)).is_err());
    }

    #[test]
    fn test_system_absent() {
        let r = req(json!({"model": "m", "messages": []}));
        assert_eq!(system_text(&r).unwrap(), None);
    }

    #[test]
    fn test_system_string() {
        let r = req(json!({"model": "m", "messages": [], "system": "be brief"}));
        assert_eq!(system_text(&r).unwrap().as_deref(), Some("be brief"));
    }

    #[test]
    fn test_system_blocks() {
        let r = req(json!({
            "model": "m", "messages": [],
            "system": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}],
        }));
        assert_eq!(system_text(&r).unwrap().as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_openai_finish_table() {
        assert_eq!(map_openai_finish(Some("stop")), "end_turn");
        assert_eq!(map_openai_finish(Some("length")), "max_tokens");
        assert_eq!(map_openai_finish(Some("tool_calls")), "tool_use");
        assert_eq!(map_openai_finish(Some("content_filter")), "refusal");
        assert_eq!(map_openai_finish(Some("weird_new_reason")), "end_turn");
        assert_eq!(map_openai_finish(None), "end_turn");
    }

    #[test]
    fn test_gemini_finish_table() {
        assert_eq!(map_gemini_finish(Some("STOP")), "end_turn");
        assert_eq!(map_gemini_finish(Some("MAX_TOKENS")), "max_tokens");
        assert_eq!(map_gemini_finish(Some("SAFETY")), "refusal");
        assert_eq!(map_gemini_finish(Some("RECITATION")), "refusal");
        assert_eq!(map_gemini_finish(Some("SOMETHING_ELSE")), "end_turn");
        assert_eq!(map_gemini_finish(None), "end_turn");
    }
}
