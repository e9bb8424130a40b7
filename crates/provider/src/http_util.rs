//! Shared HTTP plumbing for adapters: bounded send, status checking,
//! byte-stream extraction.

use futures_util::StreamExt as _;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use subgate_types::{GateError, traits::ByteStream, traits::Result};

/// HTTP helper shared by all adapters.
#[derive(Clone)]
pub struct ProviderHttp {
    http: Client,
    timeout: Duration,
}

impl ProviderHttp {
    /// Creates a helper with the given per-request deadline.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            timeout,
        }
    }

    /// Returns the inner client for building requests.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.http
    }

    /// Sends a request under the configured deadline and checks the status.
    ///
    /// # Errors
    ///
    /// [`GateError::Timeout`] when the deadline expires before response
    /// headers arrive; [`GateError::Upstream`] on a non-2xx status;
    /// transport failures as [`GateError::Http`].
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let resp = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| GateError::Timeout("upstream request".into()))??;

        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(GateError::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Turns a response into a raw byte stream.
    #[must_use]
    pub fn byte_stream(resp: Response) -> ByteStream {
        Box::pin(resp.bytes_stream().map(|r| r.map_err(GateError::from)))
    }
}
