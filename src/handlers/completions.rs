//! Chat completions relay handler
//!
//! Handles POST /v1/chat/completions by forwarding the body to the backend
//! registered for the request's `model`.

use crate::error::AppError;
use crate::handlers::AppState;
use crate::metrics::{Outcome, UNKNOWN_MODEL_LABEL};
use crate::middleware::RequestId;
use crate::relay::ChatRequest;
use axum::{
    Extension,
    extract::State,
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use std::time::Instant;

/// POST /v1/chat/completions handler
///
/// - 200 with the backend's body, byte-for-byte, when the backend answers 2xx
/// - 404 `{"error": "Model not found"}` when the model has no backend
/// - 500 `{"error": "Error forwarding request to model"}` on any forwarding failure
///
/// Nothing is retried or cached; each call is one backend request.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    request: ChatRequest,
) -> Result<Response, AppError> {
    tracing::debug!(
        request_id = %request_id,
        model = ?request.model(),
        body_bytes = request.body().len(),
        "Received chat completions request"
    );

    let start = Instant::now();
    let result = state.relay().forward(&request).await;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    let (model_label, outcome) = match &result {
        Ok(_) => (request.model().unwrap_or_default(), Outcome::Forwarded),
        Err(AppError::ModelNotFound { .. }) => (UNKNOWN_MODEL_LABEL, Outcome::ModelNotFound),
        Err(_) => (request.model().unwrap_or_default(), Outcome::ForwardFailed),
    };
    record_metrics(&state, request_id, model_label, outcome, elapsed_ms);

    match result {
        Ok(body) => {
            tracing::info!(
                request_id = %request_id,
                model = %model_label,
                response_bytes = body.len(),
                elapsed_ms,
                "Forwarded chat completion"
            );

            Ok((
                StatusCode::OK,
                [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                body,
            )
                .into_response())
        }
        Err(err) => {
            match &err {
                AppError::ModelNotFound { model } => tracing::info!(
                    request_id = %request_id,
                    model = ?model,
                    "No backend configured for requested model"
                ),
                AppError::ForwardFailed { model, reason } => tracing::warn!(
                    request_id = %request_id,
                    model = %model,
                    reason = %reason,
                    elapsed_ms,
                    "Forwarding to backend failed"
                ),
                other => tracing::error!(
                    request_id = %request_id,
                    error = %other,
                    "Unexpected relay error"
                ),
            }
            Err(err)
        }
    }
}

fn record_metrics(
    state: &AppState,
    request_id: RequestId,
    model: &str,
    outcome: Outcome,
    elapsed_ms: f64,
) {
    if let Err(e) = state.metrics().record_request(model, outcome) {
        tracing::warn!(
            request_id = %request_id,
            error = %e,
            "Failed to record request metric"
        );
    }

    if outcome != Outcome::ModelNotFound {
        if let Err(e) = state.metrics().record_forward_duration(model, elapsed_ms) {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                "Failed to record forward duration metric"
            );
        }
    }
}
