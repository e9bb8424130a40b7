//! Configuration loading and validation.
//!
//! Environment-driven via figment: every field can be set with a
//! `SUBGATE_`-prefixed variable over the defaults. Validation runs once at
//! startup and stops the process on a bad encryption secret rather than
//! writing credentials under a guessable key.

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use subgate_types::{GateError, traits::Result};

/// Runtime configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Directory holding the encrypted credential files.
    pub credentials_dir: String,
    /// Secret for the credential-file encryption key.
    pub encryption_secret: String,
    /// Salt for the credential-file encryption key.
    pub encryption_salt: String,
    /// Google OAuth client id for the gemini login flow.
    pub gemini_client_id: String,
    /// Google OAuth client secret for the gemini login flow.
    pub gemini_client_secret: String,
    /// Per-request upstream deadline, seconds.
    pub request_timeout_secs: u64,
    /// Model catalog cache lifetime, seconds.
    pub models_cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            credentials_dir: default_credentials_dir(),
            encryption_secret: "change-me".to_string(),
            encryption_salt: "change-me".to_string(),
            gemini_client_id: String::new(),
            gemini_client_secret: String::new(),
            request_timeout_secs: 300,
            models_cache_ttl_secs: 3600,
        }
    }
}

fn default_credentials_dir() -> String {
    std::env::var("HOME").map_or_else(
        |_| ".subgate/credentials".to_string(),
        |home| format!("{home}/.subgate/credentials"),
    )
}

impl Config {
    /// Loads the configuration from `SUBGATE_*` environment variables over
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] when a variable fails to parse.
    pub fn from_env() -> Result<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed("SUBGATE_"))
            .extract()
            .map_err(|e| GateError::Config(e.to_string()))
    }

    /// Rejects configurations that would store credentials under an empty
    /// or placeholder key.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] describing the offending field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("SUBGATE_ENCRYPTION_SECRET", &self.encryption_secret),
            ("SUBGATE_ENCRYPTION_SALT", &self.encryption_salt),
        ] {
            if value.is_empty() || value == "change-me" {
                return Err(GateError::Config(format!(
                    "{name} must be set to a non-placeholder value"
                )));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(GateError::Config(
                "SUBGATE_REQUEST_TIMEOUT_SECS must be positive".into(),
            ));
        }
        Ok(())
    }
}
