//! OpenAI SSE → canonical event stream re-encoder.

use crate::common::map_openai_finish;
use crate::message_id;
use crate::sse::DataLineBuffer;
use serde_json::Value;
use subgate_types::{StreamEvent, traits::StreamTranslator};

/// Incremental parser over OpenAI chat-completion chunks.
///
/// Emits the canonical event sequence exactly once; chunks that arrive after
/// the finish reason are parsed but produce nothing.
pub struct OpenAiStreamTranslator {
    id: String,
    model: String,
    lines: DataLineBuffer,
    finished: bool,
    output_tokens: u64,
}

impl OpenAiStreamTranslator {
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
            .pointer("/usage/completion_tokens")
            .and_then(Value::as_u64)
        {
            self.output_tokens = tokens;
        }

        if self.finished {
            return;
        }

        if let Some(text) = chunk
            .pointer("/choices/0/delta/content")
            .and_then(Value::as_str)
            && !text.is_empty()
        {
            events.push(StreamEvent::text_delta(text));
        }

        if let Some(reason) = chunk
            .pointer("/choices/0/finish_reason")
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
            map_openai_finish(reason),
            self.output_tokens,
        ));
        events.push(StreamEvent::message_stop());
    }
}

impl StreamTranslator for OpenAiStreamTranslator {
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
