//! `GET /v1/models` — aggregated model catalog with a TTL cache.

use crate::AppState;
use axum::{Json, extract::State};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Builds the catalog across all adapters, first-seen id wins.
fn build_catalog(state: &AppState) -> Value {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for adapter in state.router.all() {
        for id in adapter.models() {
            if seen.insert(id.clone()) {
                entries.push(json!({
                    "id": id,
                    "object": "model",
                    "created": 0,
                    "owned_by": adapter.name(),
                }));
            }
        }
    }
    json!({"object": "list", "data": entries})
}

/// Serves the catalog, rebuilding it when the cached copy is older than
/// the configured TTL.
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<Value> {
    let ttl = Duration::from_secs(state.config.models_cache_ttl_secs);
    let mut cache = state.models_cache.lock().await;

    if let Some((built_at, value)) = cache.as_ref()
        && built_at.elapsed() < ttl
    {
        return Json(value.clone());
    }

    let catalog = build_catalog(&state);
    *cache = Some((Instant::now(), catalog.clone()));
    Json(catalog)
}
