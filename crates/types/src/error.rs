//! Gateway error taxonomy.

use crate::ProviderId;
use thiserror::Error;

/// All errors the gateway can produce.
#[derive(Debug, Error)]
pub enum GateError {
    /// Authentication or authorization failure outside the refresh path.
    #[error("authentication error: {0}")]
    Auth(String),

    /// No stored credential for the provider; the operator must log in.
    #[error("no credential stored for {0}, run `subgate login {0}`")]
    TokenNotFound(ProviderId),

    /// The single refresh attempt failed and the stale record was deleted.
    #[error("token refresh for {0} failed, run `subgate login {0}` again")]
    RefreshFailed(ProviderId),

    /// The request or response cannot be mapped between protocols.
    #[error("translation error: {0}")]
    Translation(String),

    /// The upstream answered with a non-success status.
    #[error("upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The upstream did not answer within the configured deadline.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Transport-level HTTP failure (connect, TLS, body read).
    #[error("http error: {0}")]
    Http(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential store failure (I/O, decryption, corruption).
    #[error("storage error: {0}")]
    Storage(String),

    /// Invalid or missing configuration; fatal at startup.
    #[error("config error: {0}")]
    Config(String),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// Convenience result alias used across the workspace.
pub type Result<T> = std::result::Result<T, GateError>;
