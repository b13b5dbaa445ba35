//! Companion client for sending chat requests to a relay
//!
//! Used by the `send` subcommand to exercise a running relay with a vision
//! request, optionally firing several identical requests concurrently.

pub mod vision;

pub use vision::{ImageMime, VisionRequest, image_data_url};

use futures::future::join_all;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised by the companion client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image type: {0} (expected .jpg, .jpeg, .png, .gif or .webp)")]
    UnsupportedImage(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Response to one sent request
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub status: StatusCode,
    pub body: String,
    pub elapsed: Duration,
}

/// Posts chat request bodies to a relay URL
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl RelayClient {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            url: url.into(),
            api_key,
        })
    }

    /// POST one body and return the status and text, whatever the status
    pub async fn send(&self, body: &Value) -> Result<SendOutcome, ClientError> {
        let start = Instant::now();

        let mut request = self.http.post(&self.url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(SendOutcome {
            status,
            body,
            elapsed: start.elapsed(),
        })
    }

    /// Send `count` copies of `body` concurrently
    ///
    /// Returns every per-request result and the wall time for the whole batch.
    pub async fn send_concurrent(
        &self,
        body: &Value,
        count: usize,
    ) -> (Vec<Result<SendOutcome, ClientError>>, Duration) {
        let start = Instant::now();
        let results = join_all((0..count).map(|_| self.send(body))).await;
        (results, start.elapsed())
    }
}
