//! Canonical → Gemini `generateContent` request mapping.

use crate::common::{flatten_content, system_text};
use crate::schema_clean::clean_schema;
use serde_json::{Map, Value, json};
use subgate_types::{ChatRequest, GateError, traits::RequestTranslator, traits::Result};

/// Builds a Gemini-native request body from a canonical request.
///
/// The model name does not appear in the body; the adapter resolves it into
/// the request URL.
pub struct GeminiRequestTranslator;

impl GeminiRequestTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for GeminiRequestTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestTranslator for GeminiRequestTranslator {
    fn translate_request(&self, request: &ChatRequest) -> Result<Value> {
        // Gemini requires strictly alternating user/model roles, so adjacent
        // same-role turns are merged into one content entry.
        let mut contents: Vec<(String, String)> = Vec::new();
        for message in &request.messages {
            let role = match message.get("role").and_then(Value::as_str) {
                Some("assistant") => "model",
                Some("user") => "user",
                other => {
                    return Err(GateError::Translation(format!(
                        "unsupported message role: {other:?}"
                    )));
                }
            };
            let content = message
                .get("content")
                .ok_or_else(|| GateError::Translation("message missing content".into()))?;
            let text = flatten_content(content)?;

            match contents.last_mut() {
                Some((last_role, last_text)) if last_role == role => {
                    last_text.push('\n');
                    last_text.push_str(&text);
                }
                _ => contents.push((role.to_string(), text)),
            }
        }

        let mut body = Map::new();
        body.insert(
            "contents".to_string(),
            Value::Array(
                contents
                    .into_iter()
                    .map(|(role, text)| json!({"role": role, "parts": [{"text": text}]}))
                    .collect(),
            ),
        );

        if let Some(system) = system_text(request)? {
            body.insert(
                "systemInstruction".to_string(),
                json!({"parts": [{"text": system}]}),
            );
        }

        let mut generation = Map::new();
        for (src, target) in [
            ("max_tokens", "maxOutputTokens"),
            ("temperature", "temperature"),
            ("top_p", "topP"),
            ("stop_sequences", "stopSequences"),
        ] {
            if let Some(v) = request.extra_field(src) {
                generation.insert(target.to_string(), v.clone());
            }
        }
        if !generation.is_empty() {
            body.insert("generationConfig".to_string(), Value::Object(generation));
        }

        if let Some(tools) = request.extra_field("tools").and_then(Value::as_array) {
            let mut declarations = Vec::new();
            let mut grounding = false;
            for tool in tools {
                let Some(name) = tool.get("name").and_then(Value::as_str) else {
                    continue;
                };
                if name == "web_search" {
                    grounding = true;
                    continue;
                }
                declarations.push(json!({
                    "name": name,
                    "description": tool.get("description").cloned().unwrap_or(Value::Null),
                    "parameters": clean_schema(
                        tool.get("input_schema").unwrap_or(&json!({"type": "object"}))
                    ),
                }));
            }

            let mut entries = Vec::new();
            if !declarations.is_empty() {
                entries.push(json!({"functionDeclarations": declarations}));
            }
            if grounding {
                entries.push(json!({"googleSearch": {}}));
            }
            if !entries.is_empty() {
                body.insert("tools".to_string(), Value::Array(entries));
            }
        }

        Ok(Value::Object(body))
    }
}
