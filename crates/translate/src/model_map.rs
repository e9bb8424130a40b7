//! Static model-name mapping per provider.
//!
//! Requested names the provider knows pass through; a short alias table
//! covers the common canonical spellings; anything else falls back to the
//! provider's default model. Mapping never fails.

use subgate_types::ProviderId;

const CODEX_MODELS: &[&str] = &[
    "gpt-5.1-codex",
    "gpt-5.1-codex-mini",
    "gpt-5-codex",
    "gpt-5.1",
    "gpt-5",
    "o3",
    "o4-mini",
];
const CODEX_ALIASES: &[(&str, &str)] = &[
    ("codex", "gpt-5.1-codex"),
    ("codex-mini", "gpt-5.1-codex-mini"),
    ("gpt-latest", "gpt-5.1"),
];
const CODEX_DEFAULT: &str = "gpt-5.1-codex";

const GEMINI_MODELS: &[&str] = &[
    "gemini-2.5-pro",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash",
];
const GEMINI_ALIASES: &[(&str, &str)] = &[
    ("gemini-pro", "gemini-2.5-pro"),
    ("gemini-flash", "gemini-2.5-flash"),
];
const GEMINI_DEFAULT: &str = "gemini-2.5-flash";

const IFLOW_MODELS: &[&str] = &[
    "glm-4.5",
    "glm-4.5-air",
    "glm-4.6",
    "kimi-k2",
    "qwen3-coder",
];
const IFLOW_ALIASES: &[(&str, &str)] = &[("glm", "glm-4.5"), ("kimi", "kimi-k2")];
const IFLOW_DEFAULT: &str = "glm-4.5";

fn tables(provider: &ProviderId) -> (&'static [&'static str], &'static [(&'static str, &'static str)], &'static str) {
    match provider {
        ProviderId::Codex => (CODEX_MODELS, CODEX_ALIASES, CODEX_DEFAULT),
        ProviderId::Gemini => (GEMINI_MODELS, GEMINI_ALIASES, GEMINI_DEFAULT),
        ProviderId::IFlow => (IFLOW_MODELS, IFLOW_ALIASES, IFLOW_DEFAULT),
    }
}

/// Resolves the provider-native model name for a requested model string.
#[must_use]
pub fn map_model(provider: &ProviderId, requested: &str) -> String {
    let (known, aliases, default) = tables(provider);
    if known.contains(&requested) {
        return requested.to_string();
    }
    if let Some((_, target)) = aliases.iter().find(|(alias, _)| *alias == requested) {
        return (*target).to_string();
    }
    default.to_string()
}

/// Models the provider advertises in the catalog.
#[must_use]
pub fn known_models(provider: &ProviderId) -> Vec<String> {
    tables(provider).0.iter().map(ToString::to_string).collect()
}
