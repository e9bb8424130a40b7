//! Canonical SSE frame stream over an upstream byte stream.

use bytes::Bytes;
use futures_util::StreamExt as _;
use std::collections::VecDeque;
use subgate_types::{StreamEvent, traits::ByteStream, traits::StreamTranslator};

struct FrameState {
    upstream: Option<ByteStream>,
    translator: Box<dyn StreamTranslator>,
    queue: VecDeque<Bytes>,
}

/// Wraps an upstream byte stream with a [`StreamTranslator`], yielding
/// canonical SSE frames.
///
/// A mid-stream upstream failure becomes one terminal `error` frame
/// followed by stream end; the body itself never errors because the
/// response headers are already on the wire.
#[must_use]
pub fn frame_stream(upstream: ByteStream, mut translator: Box<dyn StreamTranslator>) -> ByteStream {
    let queue: VecDeque<Bytes> = translator
        .begin()
        .iter()
        .map(StreamEvent::to_frame)
        .collect();
    let state = FrameState {
        upstream: Some(upstream),
        translator,
        queue,
    };

    Box::pin(futures_util::stream::try_unfold(state, |mut st| async move {
        loop {
            if let Some(frame) = st.queue.pop_front() {
                return Ok(Some((frame, st)));
            }
            let Some(upstream) = st.upstream.as_mut() else {
                return Ok(None);
            };
            match upstream.next().await {
                Some(Ok(chunk)) => {
                    for event in st.translator.push(&chunk) {
                        st.queue.push_back(event.to_frame());
                    }
                }
                Some(Err(err)) => {
                    tracing::warn!(%err, "upstream failed mid-stream");
                    st.upstream = None;
                    st.queue
                        .push_back(StreamEvent::error("api_error", &err.to_string()).to_frame());
                }
                None => {
                    st.upstream = None;
                    for event in st.translator.finish() {
                        st.queue.push_back(event.to_frame());
                    }
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt as _;
    use subgate_translate::OpenAiStreamTranslator;
    use subgate_types::GateError;

    fn chunks(parts: &[&[u8]]) -> ByteStream {
        let items: Vec<Result<Bytes, GateError>> =
            parts.iter().map(|p| Ok(Bytes::copy_from_slice(p))).collect();
        Box::pin(futures_util::stream::iter(items))
    }

    async fn collect(stream: ByteStream) -> String {
        let frames: Vec<Bytes> = stream.try_collect().await.unwrap();
        frames
            .iter()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect()
    }

    #[tokio::test]
    async fn test_full_sequence() {
        let upstream = chunks(&[
            b"data: {\"choices\":[{\"delta\":{\"content\":\"hi\"}}]}\n",
            b"data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n",
        ]);
        let out = collect(frame_stream(
            upstream,
            Box::new(OpenAiStreamTranslator::new("gpt-5.1")),
        ))
        .await;

        let starts: Vec<usize> = [
            "event: message_start\n",
            "event: content_block_start\n",
            "event: content_block_delta\n",
            "event: content_block_stop\n",
            "event: message_delta\n",
            "event: message_stop\n",
        ]
        .iter()
        .map(|needle| out.find(needle).unwrap())
        .collect();
        assert!(starts.windows(2).all(|w| w[0] < w[1]), "events out of order");
    }

    #[tokio::test]
    async fn test_upstream_error_becomes_error_frame() {
        let items: Vec<Result<Bytes, GateError>> = vec![
            Ok(Bytes::from_static(
                b"data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n",
            )),
            Err(GateError::Http("connection reset".into())),
        ];
        let upstream: ByteStream = Box::pin(futures_util::stream::iter(items));
        let out = collect(frame_stream(
            upstream,
            Box::new(OpenAiStreamTranslator::new("m")),
        ))
        .await;

        assert!(out.contains("event: content_block_delta\n"));
        assert!(out.contains("event: error\n"));
        assert!(out.contains("connection reset"));
        // error is terminal: the stream ends without the normal trailer
        assert!(!out.contains("event: message_stop"));
    }

    #[tokio::test]
    async fn test_abrupt_upstream_end_closes_message() {
        let upstream = chunks(&[b"data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n"]);
        let out = collect(frame_stream(
            upstream,
            Box::new(OpenAiStreamTranslator::new("m")),
        ))
        .await;
        assert!(out.contains("event: message_stop\n"));
    }
}
