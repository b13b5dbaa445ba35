//! HTTP request handlers for the chatrelay API

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::middleware::request_id_middleware;
use crate::registry::EndpointRegistry;
use crate::relay::Relay;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod completions;
pub mod extractor;
pub mod health;
pub mod metrics;

/// Application state shared across all handlers
///
/// Everything inside is read-only after startup; clones are cheap.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    relay: Relay,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState from configuration and a built registry
    pub fn new(config: Arc<Config>, registry: EndpointRegistry) -> AppResult<Self> {
        let relay = Relay::new(Arc::new(registry))?;
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to initialize metrics: {}", e)))?;

        Ok(Self {
            config,
            relay,
            metrics: Arc::new(metrics),
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the relay
    pub fn relay(&self) -> &Relay {
        &self.relay
    }

    /// Get reference to the metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let max_body_bytes = state.config().server.max_body_bytes;

    Router::new()
        .route("/v1/chat/completions", post(completions::handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_state() -> AppState {
        let config = Config::default();
        let registry = EndpointRegistry::from_config(&config, |key| {
            (key == "COGVLM_ENDPOINT").then(|| "http://127.0.0.1:1/v1/chat/completions".to_string())
        })
        .expect("should build registry");
        AppState::new(Arc::new(config), registry).expect("should create AppState")
    }

    #[test]
    fn test_appstate_new_creates_state() {
        let state = create_test_state();
        assert_eq!(state.config().server.port, 8000);
        assert_eq!(state.relay().registry().len(), 1);
    }

    #[test]
    fn test_appstate_is_clonable() {
        let state = create_test_state();
        let state2 = state.clone();
        assert_eq!(state2.relay().registry().len(), 1);
    }
}
