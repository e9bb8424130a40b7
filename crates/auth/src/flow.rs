//! Interactive browser login flows.
//!
//! Each login binds the provider's loopback callback port first, then opens
//! the browser, waits for exactly one redirect, checks the CSRF `state`,
//! exchanges the code, and persists the token. The exchange itself is a
//! single bounded attempt; any failure is terminal and the operator re-runs
//! login.

use crate::manager::AuthManager;
use crate::{callback, codex, gemini, iflow, pkce};
use std::collections::HashMap;
use std::time::Duration;
use subgate_types::{GateError, OAuthToken, ProviderId, traits::Result};

const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the interactive login for a provider and stores the token.
///
/// # Errors
///
/// Any auth, network, or storage failure along the flow.
pub async fn login(manager: &AuthManager, provider: &ProviderId) -> Result<()> {
    let token = match provider {
        ProviderId::Codex => login_codex(manager).await?,
        ProviderId::Gemini => login_gemini(manager).await?,
        ProviderId::IFlow => login_iflow(manager).await?,
    };
    manager.put(provider, &token).await?;
    tracing::info!(provider = %provider, "login complete");
    Ok(())
}

async fn login_codex(manager: &AuthManager) -> Result<OAuthToken> {
    let (verifier, challenge) = pkce::generate_pkce();
    let state = pkce::random_state();

    let listener = callback::bind_callback(codex::CALLBACK_PORT).await?;
    open_browser(&codex::build_auth_url(&challenge, &state));

    let params = callback::accept_callback(listener).await?;
    let code = extract_code(&params, &state)?;

    let response = exchange(
        manager.http().post(codex::TOKEN_URL).form(&codex::token_form_params(&code, &verifier)),
    )
    .await?;
    codex::parse_token_response(&response)
}

async fn login_gemini(manager: &AuthManager) -> Result<OAuthToken> {
    let (client_id, client_secret) = manager.gemini_client();
    if client_id.is_empty() || client_secret.is_empty() {
        return Err(GateError::Config(
            "gemini login needs SUBGATE_GEMINI_CLIENT_ID and SUBGATE_GEMINI_CLIENT_SECRET".into(),
        ));
    }
    let state = pkce::random_state();

    let listener = callback::bind_callback(gemini::CALLBACK_PORT).await?;
    open_browser(&gemini::build_auth_url(client_id, &state));

    let params = callback::accept_callback(listener).await?;
    let code = extract_code(&params, &state)?;

    let response = exchange(
        manager
            .http()
            .post(gemini::TOKEN_URL)
            .form(&gemini::token_form_params(client_id, client_secret, &code)),
    )
    .await?;
    gemini::parse_token_response(&response)
}

async fn login_iflow(manager: &AuthManager) -> Result<OAuthToken> {
    let state = pkce::random_state();

    let listener = callback::bind_callback(iflow::CALLBACK_PORT).await?;
    open_browser(&iflow::build_auth_url(&state));

    let params = callback::accept_callback(listener).await?;
    let code = extract_code(&params, &state)?;

    let response = exchange(
        manager
            .http()
            .post(iflow::TOKEN_URL)
            .header("authorization", iflow::basic_auth_header())
            .form(&iflow::token_form_params(&code)),
    )
    .await?;
    iflow::parse_token_response(&response)
}

/// Validates the CSRF state and pulls the authorization code.
fn extract_code(params: &HashMap<String, String>, expected_state: &str) -> Result<String> {
    if let Some(err) = params.get("error") {
        return Err(GateError::Auth(format!("authorization denied: {err}")));
    }
    match params.get("state") {
        Some(s) if s == expected_state => {}
        _ => return Err(GateError::Auth("state mismatch in OAuth callback".into())),
    }
    params
        .get("code")
        .cloned()
        .ok_or_else(|| GateError::Auth("missing code in OAuth callback".into()))
}

async fn exchange(request: reqwest::RequestBuilder) -> Result<serde_json::Value> {
    let response = tokio::time::timeout(EXCHANGE_TIMEOUT, request.send())
        .await
        .map_err(|_| GateError::Timeout("token exchange".into()))??;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GateError::Auth(format!(
            "token exchange failed ({status}): {body}"
        )));
    }
    Ok(response.json().await?)
}

fn open_browser(url: &str) {
    println!("Opening browser for login:\n  {url}");
    if open::that(url).is_err() {
        println!("Could not open a browser automatically; visit the URL above.");
    }
}
