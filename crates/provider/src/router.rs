//! Model-string routing across adapters.
//!
//! Selection is a fixed priority walk: explicit prefix predicates
//! (codex, gemini, iflow) first, then alias substring heuristics, and the
//! pass-through last. Every model matches something.

use std::sync::Arc;
use subgate_types::traits::ProviderAdapter;

/// Ordered adapter list with alias heuristics.
pub struct AdapterRouter {
    /// Walked in order; the first `supports()` hit wins.
    managed: Vec<Arc<dyn ProviderAdapter>>,
    fallback: Arc<dyn ProviderAdapter>,
}

/// Substring → adapter-name hints, consulted only when no prefix predicate
/// claimed the model.
const ALIASES: &[(&str, &str)] = &[
    ("gpt", "codex"),
    ("openai", "codex"),
    ("codex", "codex"),
    ("gemini", "gemini"),
    ("flash", "gemini"),
    ("glm", "iflow"),
    ("kimi", "iflow"),
    ("qwen", "iflow"),
];

impl AdapterRouter {
    #[must_use]
    pub fn new(managed: Vec<Arc<dyn ProviderAdapter>>, fallback: Arc<dyn ProviderAdapter>) -> Self {
        Self { managed, fallback }
    }

    /// Picks the adapter for a model string. Total: falls back to the
    /// pass-through when nothing claims the model.
    #[must_use]
    pub fn select(&self, model: &str) -> Arc<dyn ProviderAdapter> {
        for adapter in &self.managed {
            if adapter.supports(model) {
                return Arc::clone(adapter);
            }
        }

        let lower = model.to_ascii_lowercase();
        for (needle, name) in ALIASES {
            if lower.contains(needle)
                && let Some(adapter) = self.managed.iter().find(|a| a.name() == *name)
            {
                return Arc::clone(adapter);
            }
        }

        Arc::clone(&self.fallback)
    }

    /// All adapters, managed ones first, for catalog aggregation.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn ProviderAdapter>> {
        let mut out = self.managed.clone();
        out.push(Arc::clone(&self.fallback));
        out
    }
}
