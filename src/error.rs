//! Error types for chatrelay
//!
//! All errors implement `IntoResponse` for Axum handlers. Every error body has
//! the shape `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Message returned when a request names a model with no configured backend
pub const MODEL_NOT_FOUND: &str = "Model not found";

/// Message returned for every forwarding failure (backend detail is only logged)
pub const FORWARD_FAILED: &str = "Error forwarding request to model";

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid config file {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("No backend configured for model {model:?}")]
    ModelNotFound { model: Option<String> },

    #[error("Forwarding request for model '{model}' failed: {reason}")]
    ForwardFailed { model: String, reason: String },

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("{message}")]
    BodyRejected { status: StatusCode, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::ModelNotFound { .. } => (StatusCode::NOT_FOUND, MODEL_NOT_FOUND.to_string()),
            Self::ForwardFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, FORWARD_FAILED.to_string())
            }
            Self::InvalidBody(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::BodyRejected { status, message } => (*status, message.clone()),
            Self::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
