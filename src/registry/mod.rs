//! Endpoint registry: model identifier -> backend URL
//!
//! Built once at startup from the configured model table and the environment,
//! then shared read-only by every request.

mod model_id;

pub use model_id::ModelId;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use reqwest::Url;
use std::collections::HashMap;

/// Immutable mapping from model identifier to validated backend URL
///
/// Models whose endpoint variable is unset or empty are left out, so they
/// resolve exactly like models that were never configured.
#[derive(Debug, Clone, Default)]
pub struct EndpointRegistry {
    endpoints: HashMap<ModelId, Url>,
}

impl EndpointRegistry {
    /// Build the registry reading endpoint URLs from the process environment
    pub fn from_env(config: &Config) -> AppResult<Self> {
        Self::from_config(config, |key| std::env::var(key).ok())
    }

    /// Build the registry using `lookup` to read each model's endpoint variable
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set to something that is
    /// not an absolute http(s) URL.
    pub fn from_config<F>(config: &Config, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut endpoints = HashMap::with_capacity(config.models.len());

        for route in &config.models {
            let raw = lookup(route.endpoint_env()).unwrap_or_default();
            let raw = raw.trim();

            if raw.is_empty() {
                tracing::warn!(
                    model = %route.name(),
                    endpoint_env = %route.endpoint_env(),
                    "Endpoint variable unset or empty, requests for this model will return 404"
                );
                continue;
            }

            let url = parse_backend_url(raw).map_err(|reason| {
                AppError::Config(format!(
                    "{} for model '{}' is not a valid backend URL ({}): {}",
                    route.endpoint_env(),
                    route.name(),
                    raw,
                    reason
                ))
            })?;

            tracing::debug!(model = %route.name(), url = %url, "Registered model endpoint");
            endpoints.insert(ModelId::from(route), url);
        }

        Ok(Self { endpoints })
    }

    /// Resolve the backend URL for a requested model
    ///
    /// `None` means the request carried no usable `model` field.
    pub fn resolve(&self, model: Option<&str>) -> AppResult<&Url> {
        model
            .and_then(|name| self.endpoints.get(name))
            .ok_or_else(|| AppError::ModelNotFound {
                model: model.map(str::to_string),
            })
    }

    /// Resolvable model identifiers, sorted
    pub fn models(&self) -> Vec<&ModelId> {
        let mut models: Vec<_> = self.endpoints.keys().collect();
        models.sort();
        models
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

fn parse_backend_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
