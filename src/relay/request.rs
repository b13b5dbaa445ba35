//! Inbound chat request as seen by the relay
//!
//! Only the `model` field is read. The raw bytes are kept so the backend
//! receives exactly what the caller sent.

use crate::error::{AppError, AppResult};
use axum::body::Bytes;
use serde_json::Value;

/// Opaque chat-completion payload plus its routing key
#[derive(Debug, Clone)]
pub struct ChatRequest {
    model: Option<String>,
    body: Bytes,
}

impl ChatRequest {
    /// Parse a request body
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidBody` if the bytes are not valid JSON.
    /// Valid JSON without a string `model` field is accepted and later
    /// resolves as an unknown model.
    pub fn from_bytes(body: Bytes) -> AppResult<Self> {
        let value: Value =
            serde_json::from_slice(&body).map_err(|e| AppError::InvalidBody(e.to_string()))?;

        let model = value
            .get("model")
            .and_then(Value::as_str)
            .map(str::to_owned);

        Ok(Self { model, body })
    }

    /// Wrap a body that was not sent as JSON
    ///
    /// Such a body carries no routing key, so it resolves as an unknown model.
    pub fn without_model(body: Bytes) -> Self {
        Self { model: None, body }
    }

    /// Requested model, if the payload carried one as a string
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Raw request body, forwarded unchanged
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
