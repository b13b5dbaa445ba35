//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Models that currently resolve to a backend
    pub models: Vec<String>,
}

/// Health check handler
///
/// Always 200 while the process is serving. Backends are not probed.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let models = state
        .relay()
        .registry()
        .models()
        .into_iter()
        .map(|m| m.to_string())
        .collect();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            models,
        }),
    )
}
