//! Incremental SSE data-line scanner.
//!
//! Upstream chunks split at arbitrary byte boundaries, so incomplete lines
//! are carried over between `push` calls. Only `data:` payloads survive;
//! blank lines, comment lines, and the `[DONE]` sentinel are dropped.

/// Buffers raw SSE bytes and yields complete `data:` payloads.
#[derive(Default)]
pub struct DataLineBuffer {
    pending: Vec<u8>,
}

impl DataLineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one chunk, returning each complete `data:` payload it closes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            let Some(payload) = line.strip_prefix("data:") else {
                // field lines like `event:` carry no payload we use
                continue;
            };
            let payload = payload.trim_start();
            if payload == "[DONE]" {
                continue;
            }
            payloads.push(payload.to_string());
        }
        payloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_lines() {
        let mut buf = DataLineBuffer::new();
        let out = buf.push(b"data: {\"a\":1}\n\ndata: {\"b\":2}\n\n");
        assert_eq!(out, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[test]
    fn test_split_across_chunks() {
        let mut buf = DataLineBuffer::new();
        assert!(buf.push(b"data: {\"a\"").is_empty());
        let out = buf.push(b":1}\n");
        assert_eq!(out, vec![r#"{"a":1}"#]);
    }

    #[test]
    fn test_done_and_comments_dropped() {
        let mut buf = DataLineBuffer::new();
        let out = buf.push(b": keepalive\ndata: [DONE]\n\ndata: {}\n");
        assert_eq!(out, vec!["{}"]);
    }

    #[test]
    fn test_crlf_lines() {
        let mut buf = DataLineBuffer::new();
        let out = buf.push(b"data: {\"x\":true}\r\n\r\n");
        assert_eq!(out, vec![r#"{"x":true}"#]);
    }

    #[test]
    fn test_byte_split_equivalence() {
        let input: &[u8] = b"data: {\"n\":1}\n\ndata: {\"n\":2}\n\ndata: [DONE]\n\n";
        let mut whole = DataLineBuffer::new();
        let expected = whole.push(input);

        for split in 1..input.len() {
            let mut buf = DataLineBuffer::new();
            let mut out = buf.push(&input[..split]);
            out.extend(buf.push(&input[split..]));
            assert_eq!(out, expected, "split at {split}");
        }
    }
}
