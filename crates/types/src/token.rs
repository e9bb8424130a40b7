//! OAuth token representation and expiry handling.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Tokens within this many seconds of expiry are treated as stale and
/// refreshed proactively, so an in-flight upstream call never races the
/// actual expiry instant.
pub const EXPIRY_BUFFER_SECS: u64 = 300;

/// An OAuth 2.0 access token with optional refresh material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token, if the provider issued one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Absolute expiry as unix seconds. `None` means the token never expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<u64>,
    /// Granted scopes, space-separated, as returned by the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Lifecycle state of a stored token, derived from its expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Usable as-is.
    Valid,
    /// Within the expiry buffer; must be refreshed before use.
    Stale,
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl OAuthToken {
    /// Creates a token with only an access token.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            scope: None,
        }
    }

    /// Attaches a refresh token.
    #[must_use]
    pub fn with_refresh(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets expiry `expires_in` seconds from now.
    #[must_use]
    pub fn with_expiry(mut self, expires_in: u64) -> Self {
        self.expires_at = Some(now_unix() + expires_in);
        self
    }

    /// Attaches the granted scope string.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Whether the token is expired or within [`EXPIRY_BUFFER_SECS`] of
    /// expiry. Tokens without an `expires_at` never expire.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => now_unix() + EXPIRY_BUFFER_SECS >= exp,
            None => false,
        }
    }

    /// Lifecycle state derived from [`Self::is_expired`].
    #[must_use]
    pub fn state(&self) -> TokenState {
        if self.is_expired() {
            TokenState::Stale
        } else {
            TokenState::Valid
        }
    }

    /// Merges a refresh response into this token: the new access token and
    /// expiry replace the old ones, and the refresh token rotates only when
    /// the provider issued a new one.
    #[must_use]
    pub fn merged_with(&self, fresh: Self) -> Self {
        Self {
            access_token: fresh.access_token,
            refresh_token: fresh.refresh_token.or_else(|| self.refresh_token.clone()),
            expires_at: fresh.expires_at,
            scope: fresh.scope.or_else(|| self.scope.clone()),
        }
    }
}
