//! HTTP surface: the canonical `/v1/messages` endpoint and the aggregated
//! model catalog.

pub mod error;
pub mod messages;
pub mod models;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Instant;
use subgate_config::Config;
use subgate_provider::AdapterRouter;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared state behind the HTTP handlers.
pub struct AppState {
    pub config: Config,
    pub router: AdapterRouter,
    /// Model catalog cache: built lazily, kept for the configured TTL.
    pub models_cache: Mutex<Option<(Instant, serde_json::Value)>>,
}

impl AppState {
    #[must_use]
    pub fn new(config: Config, router: AdapterRouter) -> Self {
        Self {
            config,
            router,
            models_cache: Mutex::new(None),
        }
    }
}

/// Builds the axum application.
#[must_use]
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/messages", post(messages::create_message))
        .route("/v1/models", get(models::list_models))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
