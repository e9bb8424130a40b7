//! Canonical server-sent-event frames.
//!
//! Every streamed response, whichever upstream produced it, is re-emitted as
//! the fixed event sequence `message_start`, `content_block_start`,
//! `content_block_delta`*, `content_block_stop`, `message_delta`,
//! `message_stop`, with `error` as the terminal frame on failure.

use bytes::Bytes;
use serde_json::{Value, json};

/// A named SSE event with a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    /// Event name as written on the `event:` line.
    pub name: &'static str,
    /// JSON payload written on the `data:` line.
    pub data: Value,
}

impl StreamEvent {
    /// Serializes the event to its wire frame:
    /// `event: <name>\ndata: <json>\n\n`.
    #[must_use]
    pub fn to_frame(&self) -> Bytes {
        Bytes::from(format!("event: {}\ndata: {}\n\n", self.name, self.data))
    }

    /// `message_start` with an empty assistant message skeleton.
    #[must_use]
    pub fn message_start(id: &str, model: &str) -> Self {
        Self {
            name: "message_start",
            data: json!({
                "type": "message_start",
                "message": {
                    "id": id,
                    "type": "message",
                    "role": "assistant",
                    "content": [],
                    "model": model,
                    "stop_reason": null,
                    "stop_sequence": null,
                    "usage": {"input_tokens": 0, "output_tokens": 0},
                },
            }),
        }
    }

    /// `content_block_start` opening the single text block at index 0.
    #[must_use]
    pub fn content_block_start() -> Self {
        Self {
            name: "content_block_start",
            data: json!({
                "type": "content_block_start",
                "index": 0,
                "content_block": {"type": "text", "text": ""},
            }),
        }
    }

    /// `content_block_delta` carrying a text fragment.
    #[must_use]
    pub fn text_delta(text: &str) -> Self {
        Self {
            name: "content_block_delta",
            data: json!({
                "type": "content_block_delta",
                "index": 0,
                "delta": {"type": "text_delta", "text": text},
            }),
        }
    }

    /// `content_block_stop` closing the block at index 0.
    #[must_use]
    pub fn content_block_stop() -> Self {
        Self {
            name: "content_block_stop",
            data: json!({"type": "content_block_stop", "index": 0}),
        }
    }

    /// `message_delta` carrying the final stop reason and output token count.
    #[must_use]
    pub fn message_delta(stop_reason: &str, output_tokens: u64) -> Self {
        Self {
            name: "message_delta",
            data: json!({
                "type": "message_delta",
                "delta": {"stop_reason": stop_reason, "stop_sequence": null},
                "usage": {"output_tokens": output_tokens},
            }),
        }
    }

    /// `message_stop`, the last frame of a successful stream.
    #[must_use]
    pub fn message_stop() -> Self {
        Self {
            name: "message_stop",
            data: json!({"type": "message_stop"}),
        }
    }

    /// Terminal `error` frame, emitted when the upstream fails mid-stream
    /// and the response headers have already been sent.
    #[must_use]
    pub fn error(error_type: &str, message: &str) -> Self {
        Self {
            name: "error",
            data: json!({
                "type": "error",
                "error": {"type": error_type, "message": message},
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_format() {
        let frame = StreamEvent::message_stop().to_frame();
        let text = std::str::from_utf8(&frame).unwrap();
        assert!(text.starts_with("event: message_stop\ndata: {"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_message_start_skeleton() {
        let ev = StreamEvent::message_start("msg_1", "gpt-5.1-codex");
        assert_eq!(ev.data["message"]["id"], "msg_1");
        assert_eq!(ev.data["message"]["content"], serde_json::json!([]));
        assert_eq!(ev.data["message"]["usage"]["output_tokens"], 0);
    }

    #[test]
    fn test_text_delta_payload() {
        let ev = StreamEvent::text_delta("hello");
        assert_eq!(ev.data["delta"]["type"], "text_delta");
        assert_eq!(ev.data["delta"]["text"], "hello");
        assert_eq!(ev.data["index"], 0);
    }

    #[test]
    fn test_message_delta_stop_reason() {
        let ev = StreamEvent::message_delta("end_turn", 42);
        assert_eq!(ev.data["delta"]["stop_reason"], "end_turn");
        assert_eq!(ev.data["usage"]["output_tokens"], 42);
    }

    #[test]
    fn test_error_envelope() {
        let ev = StreamEvent::error("api_error", "upstream hung up");
        assert_eq!(ev.data["type"], "error");
        assert_eq!(ev.data["error"]["type"], "api_error");
    }
}
