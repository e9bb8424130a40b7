//! JSON Schema cleanup for Gemini function declarations.
//!
//! Gemini's `functionDeclarations` accept a restricted schema dialect, so
//! metadata keys are stripped recursively and `const` is rewritten as a
//! single-value `enum`.

use serde_json::Value;

const DROPPED_KEYS: &[&str] = &["$schema", "additionalProperties", "title", "strict"];

/// Returns a structural copy of `schema` with unsupported keys removed.
#[must_use]
pub fn clean_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                if DROPPED_KEYS.contains(&key.as_str()) {
                    continue;
                }
                if key == "const" {
                    out.insert("enum".to_string(), Value::Array(vec![clean_schema(value)]));
                    continue;
                }
                out.insert(key.clone(), clean_schema(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(clean_schema).collect()),
        other => other.clone(),
    }
}
