//! Google OAuth 2.0 Authorization Code flow for Gemini.
//!
//! Plain auth-code exchange with a configured `client_id`/`client_secret`
//! pair. Callback port: 8085.

use subgate_types::{OAuthToken, traits::Result};

/// Local callback port for the OAuth redirect.
pub const CALLBACK_PORT: u16 = 8085;

/// Google OAuth 2.0 authorization endpoint.
pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth 2.0 token endpoint.
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth scopes requested during authorization.
pub const SCOPES: &[&str] = &[
    "openid",
    "email",
    "https://www.googleapis.com/auth/generative-language.retriever",
];
const REDIRECT_URI: &str = "http://localhost:8085/callback";
const REDIRECT_URI_ENCODED: &str = "http%3A%2F%2Flocalhost%3A8085%2Fcallback";

/// Build the authorization URL.
#[must_use]
pub fn build_auth_url(client_id: &str, state: &str) -> String {
    let scope = SCOPES.join("%20");
    format!(
        "{AUTH_URL}?response_type=code&client_id={client_id}&redirect_uri={REDIRECT_URI_ENCODED}&scope={scope}&state={state}&access_type=offline&prompt=consent",
    )
}

/// Build the form parameters for the token exchange request.
#[must_use]
pub fn token_form_params(
    client_id: &str,
    client_secret: &str,
    code: &str,
) -> Vec<(String, String)> {
    vec![
        ("grant_type".into(), "authorization_code".into()),
        ("client_id".into(), client_id.into()),
        ("client_secret".into(), client_secret.into()),
        ("code".into(), code.into()),
        ("redirect_uri".into(), REDIRECT_URI.into()),
    ]
}

/// Build the form parameters for a refresh request.
#[must_use]
pub fn refresh_form_params(
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Vec<(String, String)> {
    vec![
        ("grant_type".into(), "refresh_token".into()),
        ("client_id".into(), client_id.into()),
        ("client_secret".into(), client_secret.into()),
        ("refresh_token".into(), refresh_token.into()),
    ]
}

/// Parse the token endpoint JSON response into an [`OAuthToken`].
///
/// # Errors
///
/// Returns an error if the response is missing the `access_token` field.
pub fn parse_token_response(json: &serde_json::Value) -> Result<OAuthToken> {
    crate::codex::parse_oauth_token(json)
}
