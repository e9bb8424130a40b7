//! Provider identifiers for the managed upstream backends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an upstream provider with a managed OAuth credential.
///
/// The Anthropic pass-through backend is deliberately absent: it carries no
/// managed credential and is addressed only through the adapter router.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Codex,
    Gemini,
    IFlow,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codex => write!(f, "codex"),
            Self::Gemini => write!(f, "gemini"),
            Self::IFlow => write!(f, "iflow"),
        }
    }
}

impl std::str::FromStr for ProviderId {
    type Err = crate::GateError;

    /// Parse a provider name or well-known alias into a [`ProviderId`].
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Auth`] if the string does not match any known
    /// provider name or alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "codex" | "openai" => Ok(Self::Codex),
            "gemini" | "google" => Ok(Self::Gemini),
            "iflow" | "zai" | "glm" => Ok(Self::IFlow),
            other => Err(crate::GateError::Auth(format!(
                "unknown provider: {other}"
            ))),
        }
    }
}

impl ProviderId {
    /// Returns all managed provider variants.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::Codex, Self::Gemini, Self::IFlow]
    }

    /// Name of the encrypted credential file for this provider.
    #[must_use]
    pub fn credential_file(&self) -> String {
        format!("{self}.cred")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display() {
        assert_eq!(ProviderId::Codex.to_string(), "codex");
        assert_eq!(ProviderId::Gemini.to_string(), "gemini");
        assert_eq!(ProviderId::IFlow.to_string(), "iflow");
    }

    #[test]
    fn test_from_str_canonical() {
        assert_eq!(ProviderId::from_str("codex").unwrap(), ProviderId::Codex);
        assert_eq!(ProviderId::from_str("gemini").unwrap(), ProviderId::Gemini);
        assert_eq!(ProviderId::from_str("iflow").unwrap(), ProviderId::IFlow);
    }

    #[test]
    fn test_from_str_aliases() {
        assert_eq!(ProviderId::from_str("openai").unwrap(), ProviderId::Codex);
        assert_eq!(ProviderId::from_str("google").unwrap(), ProviderId::Gemini);
        assert_eq!(ProviderId::from_str("glm").unwrap(), ProviderId::IFlow);
        assert_eq!(ProviderId::from_str("zai").unwrap(), ProviderId::IFlow);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = ProviderId::from_str("xyz").unwrap_err();
        assert!(err.to_string().contains("xyz"));
    }

    #[test]
    fn test_credential_file() {
        assert_eq!(ProviderId::Codex.credential_file(), "codex.cred");
    }

    #[test]
    fn test_serde_roundtrip() {
        for p in ProviderId::all() {
            let json = serde_json::to_string(p).unwrap();
            let back: ProviderId = serde_json::from_str(&json).unwrap();
            assert_eq!(&back, p);
        }
    }
}
