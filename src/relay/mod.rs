//! Request relay: resolve the model's backend and forward the body
//!
//! Stateless per request. The registry is read-only and the HTTP client is a
//! shared connection pool, so a `Relay` is cloned freely across handlers.

mod request;

pub use request::ChatRequest;

use crate::error::{AppError, AppResult};
use crate::registry::EndpointRegistry;
use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;

/// Forwards chat requests to the backend registered for their model
#[derive(Clone)]
pub struct Relay {
    registry: Arc<EndpointRegistry>,
    client: reqwest::Client,
}

impl Relay {
    /// Create a relay with a default-configured HTTP client
    ///
    /// No timeout is set on the client; request duration is bounded only by
    /// reqwest and the hosting environment.
    pub fn new(registry: Arc<EndpointRegistry>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(registry, client))
    }

    pub fn with_client(registry: Arc<EndpointRegistry>, client: reqwest::Client) -> Self {
        Self { registry, client }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    /// Resolve the request's model and POST its body to the backend
    ///
    /// Returns the backend's response body unchanged on a 2xx status.
    ///
    /// # Errors
    ///
    /// - `AppError::ModelNotFound` if the model has no registered backend
    /// - `AppError::ForwardFailed` on connection errors, non-2xx statuses, or
    ///   a body that cannot be read
    pub async fn forward(&self, request: &ChatRequest) -> AppResult<Bytes> {
        let url = self.registry.resolve(request.model())?;
        // resolve() only succeeds when a model was present
        let model = request.model().unwrap_or_default();

        let forward_failed = |reason: String| AppError::ForwardFailed {
            model: model.to_string(),
            reason,
        };

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(request.body().clone())
            .send()
            .await
            .map_err(|e| forward_failed(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(forward_failed(format!(
                "backend {} returned status {}",
                url, status
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| forward_failed(format!("reading response from {} failed: {}", url, e)))
    }
}
