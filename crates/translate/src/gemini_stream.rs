//! Gemini SSE → canonical event stream re-encoder.
//!
//! Gemini's `streamGenerateContent?alt=sse` emits whole `GenerateContent`
//! responses as chunks; each carries zero or more text parts and the last
//! one a `finishReason`.

use crate::common::map_gemini_finish;
use crate::message_id;
use crate::sse::DataLineBuffer;
use serde_json::Value;
use subgate_types::{StreamEvent, traits::StreamTranslator};

/// Incremental parser over Gemini streaming chunks.
pub struct GeminiStreamTranslator {
    id: String,
    model: String,
    lines: DataLineBuffer,
    finished: bool,
    output_tokens: u64,
}

impl GeminiStreamTranslator {
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: message_id(),
            model: model.into(),
            lines: DataLineBuffer::new(),
            finished: false,
            output_tokens: 0,
        }
    }

    fn consume_payload(&mut self, payload: &str, events: &mut Vec<StreamEvent>) {
        let chunk: Value = match serde_json::from_str(payload) {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!(%err, "skipping malformed stream chunk");
                return;
            }
        };

        if let Some(tokens) = chunk
            .pointer("/usageMetadata/candidatesTokenCount")
            .and_then(Value::as_u64)
        {
            self.output_tokens = tokens;
        }

        if self.finished {
            return;
        }

        if let Some(parts) = chunk
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
        {
            for part in parts {
                if let Some(text) = part.get("text").and_then(Value::as_str)
                    && !text.is_empty()
                {
                    events.push(StreamEvent::text_delta(text));
                }
            }
        }

        if let Some(reason) = chunk
            .pointer("/candidates/0/finishReason")
            .and_then(Value::as_str)
        {
            self.emit_terminal(Some(reason), events);
        }
    }

    fn emit_terminal(&mut self, reason: Option<&str>, events: &mut Vec<StreamEvent>) {
        if self.finished {
            return;
        }
        self.finished = true;
        events.push(StreamEvent::content_block_stop());
        events.push(StreamEvent::message_delta(
            map_gemini_finish(reason),
            self.output_tokens,
        ));
        events.push(StreamEvent::message_stop());
    }
}

impl StreamTranslator for GeminiStreamTranslator {
    fn begin(&mut self) -> Vec<StreamEvent> {
        vec![
            StreamEvent::message_start(&self.id, &self.model),
            StreamEvent::content_block_start(),
        ]
    }

    fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        for payload in self.lines.push(chunk) {
            self.consume_payload(&payload, &mut events);
        }
        events
    }

    fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        self.emit_terminal(None, &mut events);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(chunks: &[&[u8]]) -> Vec<&'static str> {
        let mut tr = GeminiStreamTranslator::new("gemini-2.5-flash");
        let mut names: Vec<&'static str> = tr.begin().iter().map(|e| e.name).collect();
        for chunk in chunks {
            names.extend(tr.push(chunk).iter().map(|e| e.name));
        }
        names.extend(tr.finish().iter().map(|e| e.name));
        names
    }

    #[test]
    fn test_event_order() {
        let names = drive(&[
            b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"hi\"}]}}]}\n",
            b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"!\"}]},\"finishReason\":\"STOP\"}],\"usageMetadata\":{\"candidatesTokenCount\":2}}\n",
        ]);
        assert_eq!(
            names,
            &[
                "message_start",
                "content_block_start",
                "content_block_delta",
                "content_block_delta",
                "content_block_stop",
                "message_delta",
                "message_stop",
            ]
        );
    }

    #[test]
    fn test_final_chunk_carries_delta_and_terminal() {
        let mut tr = GeminiStreamTranslator::new("m");
        tr.begin();
        let events = tr.push(
            b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"bye\"}]},\"finishReason\":\"STOP\"}]}\n",
        );
        let names: Vec<_> = events.iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            &["content_block_delta", "content_block_stop", "message_delta", "message_stop"]
        );
        assert_eq!(events[0].data["delta"]["text"], "bye");
    }

    #[test]
    fn test_max_tokens_reason() {
        let mut tr = GeminiStreamTranslator::new("m");
        tr.begin();
        let events = tr.push(b"data: {\"candidates\":[{\"finishReason\":\"MAX_TOKENS\"}]}\n");
        let delta = events.iter().find(|e| e.name == "message_delta").unwrap();
        assert_eq!(delta.data["delta"]["stop_reason"], "max_tokens");
    }

    #[test]
    fn test_abrupt_end_terminates_once() {
        let names = drive(&[
            b"data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"x\"}]}}]}\n",
        ]);
        assert_eq!(names.last(), Some(&"message_stop"));
        assert_eq!(names.iter().filter(|n| **n == "message_stop").count(), 1);
    }

    #[test]
    fn test_malformed_chunk_skipped() {
        let names = drive(&[
            b"data: ???\n",
            b"data: {\"candidates\":[{\"finishReason\":\"STOP\"}]}\n",
        ]);
        assert!(names.contains(&"message_stop"));
    }
}
