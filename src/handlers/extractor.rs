//! Body extractor for relayed chat requests
//!
//! Reads the raw body (subject to the router's `DefaultBodyLimit`) and parses
//! just enough of it to find the `model` field. A body sent without a JSON
//! content type is not parsed and carries no model. Errors use the relay's
//! `{"error": "..."}` body shape.

use crate::error::AppError;
use crate::relay::ChatRequest;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header::CONTENT_TYPE},
};

impl<S> FromRequest<S> for ChatRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());

        // Oversized bodies fail here with 413 from the body limit layer
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BodyRejected {
                status: rejection.status(),
                message: rejection.body_text(),
            })?;

        if is_json {
            ChatRequest::from_bytes(body)
        } else {
            Ok(ChatRequest::without_model(body))
        }
    }
}

/// `application/json` or any `application/*+json`, parameters ignored
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_accepts_json_content_types() {
        assert!(has_json_content_type(&headers_with("application/json")));
        assert!(has_json_content_type(&headers_with(
            "application/json; charset=utf-8"
        )));
        assert!(has_json_content_type(&headers_with("Application/JSON")));
        assert!(has_json_content_type(&headers_with(
            "application/vnd.api+json"
        )));
    }

    #[test]
    fn test_rejects_other_content_types() {
        assert!(!has_json_content_type(&HeaderMap::new()));
        assert!(!has_json_content_type(&headers_with("text/plain")));
        assert!(!has_json_content_type(&headers_with(
            "application/x-www-form-urlencoded"
        )));
    }
}
