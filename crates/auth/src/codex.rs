//! `OpenAI` Codex Authorization Code + PKCE (S256) flow.
//!
//! Callback port: 1455.

use subgate_types::{GateError, OAuthToken, traits::Result};

/// OAuth 2.0 client ID for Codex.
pub const CLIENT_ID: &str = "app_EMoamEEZ73f0CkXaXp7hrann";

/// Local callback port for the OAuth redirect.
pub const CALLBACK_PORT: u16 = 1455;

/// `OpenAI` OAuth authorization endpoint.
pub const AUTH_URL: &str = "https://auth.openai.com/oauth/authorize";

/// `OpenAI` OAuth token endpoint.
pub const TOKEN_URL: &str = "https://auth.openai.com/oauth/token";

/// OAuth scopes requested during authorization.
pub const SCOPES: &[&str] = &["openid", "email", "profile", "offline_access"];

const REDIRECT_URI_ENCODED: &str = "http%3A%2F%2Flocalhost%3A1455%2Fauth%2Fcallback";
const REDIRECT_URI: &str = "http://localhost:1455/auth/callback";

/// Build the authorization URL with PKCE parameters.
#[must_use]
pub fn build_auth_url(code_challenge: &str, state: &str) -> String {
    let scope = SCOPES.join("+");
    format!(
        "{AUTH_URL}?client_id={CLIENT_ID}&code_challenge={code_challenge}&code_challenge_method=S256&codex_cli_simplified_flow=true&id_token_add_organizations=true&prompt=login&redirect_uri={REDIRECT_URI_ENCODED}&response_type=code&scope={scope}&state={state}",
    )
}

/// Build the form-urlencoded parameters for the token exchange request.
#[must_use]
pub fn token_form_params<'a>(
    code: &'a str,
    code_verifier: &'a str,
) -> [(&'static str, &'a str); 5] {
    [
        ("grant_type", "authorization_code"),
        ("client_id", CLIENT_ID),
        ("code", code),
        ("redirect_uri", REDIRECT_URI),
        ("code_verifier", code_verifier),
    ]
}

/// Build the form-urlencoded parameters for a refresh request.
#[must_use]
pub fn refresh_form_params(refresh_token: &str) -> [(&'static str, &str); 3] {
    [
        ("grant_type", "refresh_token"),
        ("client_id", CLIENT_ID),
        ("refresh_token", refresh_token),
    ]
}

/// Parse the token endpoint JSON response into an [`OAuthToken`].
///
/// # Errors
///
/// Returns an error if the response is missing the `access_token` field.
pub fn parse_token_response(json: &serde_json::Value) -> Result<OAuthToken> {
    parse_oauth_token(json)
}

/// Shared parser for standard OAuth token responses.
pub(crate) fn parse_oauth_token(json: &serde_json::Value) -> Result<OAuthToken> {
    let access_token = json
        .get("access_token")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| GateError::Auth("missing access_token".into()))?
        .to_string();

    let mut token = OAuthToken::new(access_token);
    if let Some(r) = json
        .get("refresh_token")
        .and_then(serde_json::Value::as_str)
    {
        token = token.with_refresh(r);
    }
    if let Some(exp) = json.get("expires_in").and_then(serde_json::Value::as_u64) {
        token = token.with_expiry(exp);
    }
    if let Some(scope) = json.get("scope").and_then(serde_json::Value::as_str) {
        token = token.with_scope(scope);
    }
    Ok(token)
}
