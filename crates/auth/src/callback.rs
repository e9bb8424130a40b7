//! Local HTTP callback listener for OAuth redirect flows.
//!
//! Binds a TCP listener on `127.0.0.1:<port>`, waits for the provider to
//! redirect the browser back, and extracts the query parameters (`code`,
//! `state`) from the request. There is no deadline on the wait: the
//! operator may take as long as they need in the browser.

use std::collections::HashMap;
use subgate_types::{GateError, traits::Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const SUCCESS_HTML: &[u8] =
    b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n\
    <html><body><h1>Login successful!</h1><p>You may close this tab.</p></body></html>";

/// Bind the local callback port and return the listener.
///
/// Bind **before** opening the browser so the redirect can never race the
/// listener, then call [`accept_callback`].
///
/// # Errors
///
/// Returns an error if the port is already in use or cannot be bound.
pub async fn bind_callback(port: u16) -> Result<TcpListener> {
    let addr = format!("127.0.0.1:{port}");
    TcpListener::bind(&addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            GateError::Auth(format!(
                "callback port {port} is already in use; close the other process (`lsof -i :{port}`) and retry"
            ))
        } else {
            GateError::Auth(format!("cannot bind callback port {port}: {e}"))
        }
    })
}

/// Wait for a single OAuth callback on an already-bound listener.
///
/// # Errors
///
/// Returns an error on accept/read failure or a malformed redirect request.
pub async fn accept_callback(listener: TcpListener) -> Result<HashMap<String, String>> {
    let (mut stream, _) = listener
        .accept()
        .await
        .map_err(|e| GateError::Auth(e.to_string()))?;

    let mut buf = vec![0u8; 8192];
    let n = stream
        .read(&mut buf)
        .await
        .map_err(|e| GateError::Auth(e.to_string()))?;

    let request = String::from_utf8_lossy(&buf[..n]);
    let params = parse_query_from_request(&request)?;

    stream
        .write_all(SUCCESS_HTML)
        .await
        .map_err(|e| GateError::Auth(format!("write error: {e}")))?;
    let _ = stream.shutdown().await;

    Ok(params)
}

fn parse_query_from_request(request: &str) -> Result<HashMap<String, String>> {
    // First line format: "GET /?code=...&state=... HTTP/1.1"
    let first_line = request.lines().next().unwrap_or("");
    let path = first_line.split_ascii_whitespace().nth(1).unwrap_or("/");
    let query = path.split_once('?').map_or("", |(_, q)| q);
    serde_urlencoded::from_str(query)
        .map_err(|e| GateError::Auth(format!("invalid callback query params: {e}")))
}
