//! Canonical → OpenAI chat-completions request mapping (codex and iflow).

use crate::common::{copy_present_params, flatten_content, system_text};
use crate::model_map;
use serde_json::{Map, Value, json};
use subgate_types::{ChatRequest, GateError, ProviderId, traits::RequestTranslator, traits::Result};

/// Builds an OpenAI-format request body from a canonical request.
pub struct OpenAiRequestTranslator {
    provider: ProviderId,
}

impl OpenAiRequestTranslator {
    #[must_use]
    pub fn new(provider: ProviderId) -> Self {
        Self { provider }
    }
}

impl RequestTranslator for OpenAiRequestTranslator {
    fn translate_request(&self, request: &ChatRequest) -> Result<Value> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if let Some(system) = system_text(request)? {
            messages.push(json!({"role": "system", "content": system}));
        }

        for message in &request.messages {
            let role = message
                .get("role")
                .and_then(Value::as_str)
                .ok_or_else(|| GateError::Translation("message missing role".into()))?;
            let content = message
                .get("content")
                .ok_or_else(|| GateError::Translation("message missing content".into()))?;
            messages.push(json!({"role": role, "content": flatten_content(content)?}));
        }

        let mut body = Map::new();
        body.insert(
            "model".to_string(),
            Value::String(model_map::map_model(&self.provider, &request.model)),
        );
        body.insert("messages".to_string(), Value::Array(messages));
        body.insert("stream".to_string(), Value::Bool(request.stream));
        copy_present_params(
            request,
            &mut body,
            &[
                ("max_tokens", "max_tokens"),
                ("temperature", "temperature"),
                ("top_p", "top_p"),
                ("stop_sequences", "stop"),
            ],
        );

        if let Some(tools) = request.extra_field("tools").and_then(Value::as_array) {
            let functions: Vec<Value> = tools
                .iter()
                .filter_map(|t| {
                    let name = t.get("name").and_then(Value::as_str)?;
                    Some(json!({
                        "type": "function",
                        "function": {
                            "name": name,
                            "description": t.get("description").cloned().unwrap_or(Value::Null),
                            "parameters": t.get("input_schema").cloned().unwrap_or_else(|| json!({"type": "object"})),
                        },
                    }))
                })
                .collect();
            if !functions.is_empty() {
                body.insert("tools".to_string(), Value::Array(functions));
            }
        }

        Ok(Value::Object(body))
    }
}
