//! iFlow platform (Z.ai / GLM) Authorization Code flow.
//!
//! Token exchange authenticates with an HTTP Basic Auth header.
//! Callback port: 11451.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use subgate_types::{OAuthToken, traits::Result};

pub const CLIENT_ID: &str = "10009311001";
pub const CLIENT_SECRET: &str = "4Z3YjXycVsQvyGF1etiNlIBB4RsqSDtW";
pub const CALLBACK_PORT: u16 = 11451;
pub const AUTH_URL: &str = "https://iflow.cn/oauth";
pub const TOKEN_URL: &str = "https://iflow.cn/oauth/token";
const REDIRECT_URI: &str = "http://localhost:11451/callback";
const REDIRECT_URI_ENCODED: &str = "http%3A%2F%2Flocalhost%3A11451%2Fcallback";

/// Build the authorization URL.
#[must_use]
pub fn build_auth_url(state: &str) -> String {
    format!(
        "{AUTH_URL}?response_type=code&client_id={CLIENT_ID}&redirect_uri={REDIRECT_URI_ENCODED}&state={state}&loginMethod=phone&type=phone",
    )
}

/// Generate the HTTP Basic Auth header value:
/// `Basic base64(client_id:client_secret)`.
#[must_use]
pub fn basic_auth_header() -> String {
    let cred = format!("{CLIENT_ID}:{CLIENT_SECRET}");
    format!("Basic {}", STANDARD.encode(cred.as_bytes()))
}

/// Build form parameters for the token exchange request.
///
/// `client_secret` travels in the Basic Auth header, not the form body.
#[must_use]
pub fn token_form_params(code: &str) -> Vec<(String, String)> {
    vec![
        ("grant_type".into(), "authorization_code".into()),
        ("client_id".into(), CLIENT_ID.into()),
        ("code".into(), code.into()),
        ("redirect_uri".into(), REDIRECT_URI.into()),
    ]
}

/// Build form parameters for a refresh request.
#[must_use]
pub fn refresh_form_params(refresh_token: &str) -> Vec<(String, String)> {
    vec![
        ("grant_type".into(), "refresh_token".into()),
        ("client_id".into(), CLIENT_ID.into()),
        ("refresh_token".into(), refresh_token.into()),
    ]
}

/// Parse the token endpoint response into an [`OAuthToken`].
///
/// # Errors
///
/// Returns an error if the response is missing the `access_token` field.
pub fn parse_token_response(json: &serde_json::Value) -> Result<OAuthToken> {
    crate::codex::parse_oauth_token(json)
}
