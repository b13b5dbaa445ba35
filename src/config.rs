//! Configuration management for chatrelay
//!
//! Parses TOML configuration files and provides typed access to settings.
//! Backend URLs are never written into the file: each model names the
//! environment variable that holds its endpoint, and the registry reads those
//! variables once at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub models: Vec<ModelRoute>,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body; base64 images make these big
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind, assuming `Config::validate()` has passed
    pub fn socket_addr(&self) -> SocketAddr {
        let ip = self
            .host
            .parse::<IpAddr>()
            .unwrap_or_else(|_| IpAddr::from([0, 0, 0, 0]));
        SocketAddr::from((ip, self.port))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    20 * 1024 * 1024
}

/// One routable model: its public identifier and the variable holding its URL
///
/// Fields are private; instances come from deserialization or `ModelRoute::new`
/// and are checked by `Config::validate()`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ModelRoute {
    name: String,
    endpoint_env: String,
}

impl ModelRoute {
    pub fn new(name: impl Into<String>, endpoint_env: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint_env: endpoint_env.into(),
        }
    }

    /// Model identifier matched against the request's `model` field
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the environment variable holding the backend URL
    pub fn endpoint_env(&self) -> &str {
        &self.endpoint_env
    }
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    /// Built-in model table used when no config file is given
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            models: vec![
                ModelRoute::new("cogvlm-chat-17b", "COGVLM_ENDPOINT"),
                ModelRoute::new("qwenvl-chat", "QWENVL_ENDPOINT"),
            ],
            observability: ObservabilityConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        config
            .validate()
            .map_err(|e| crate::error::AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`; call it explicitly when a
    /// `Config` is assembled in code.
    pub fn validate(&self) -> crate::error::AppResult<()> {
        if self.server.host.parse::<IpAddr>().is_err() {
            return Err(crate::error::AppError::Config(format!(
                "server.host '{}' is not an IP address",
                self.server.host
            )));
        }

        if self.server.max_body_bytes == 0 {
            return Err(crate::error::AppError::Config(
                "server.max_body_bytes must be greater than 0".to_string(),
            ));
        }

        if self.models.is_empty() {
            return Err(crate::error::AppError::Config(
                "no models configured. Add at least one entry, e.g.:\n\n\
                [[models]]\n\
                name = \"cogvlm-chat-17b\"\n\
                endpoint_env = \"COGVLM_ENDPOINT\""
                    .to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                return Err(crate::error::AppError::Config(
                    "model name must not be empty".to_string(),
                ));
            }

            if !seen.insert(model.name.as_str()) {
                return Err(crate::error::AppError::Config(format!(
                    "model '{}' is configured more than once",
                    model.name
                )));
            }

            if !is_env_var_name(&model.endpoint_env) {
                return Err(crate::error::AppError::Config(format!(
                    "model '{}' has invalid endpoint_env '{}'. \
                    Use letters, digits and underscores, not starting with a digit.",
                    model.name, model.endpoint_env
                )));
            }
        }

        Ok(())
    }
}

fn is_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl FromStr for Config {
    type Err = crate::error::AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(toml_str).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            }
        })?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 9000
max_body_bytes = 1048576

[[models]]
name = "cogvlm-chat-17b"
endpoint_env = "COGVLM_ENDPOINT"

[[models]]
name = "qwenvl-chat"
endpoint_env = "QWENVL_ENDPOINT"

[observability]
log_level = "debug"
"#;

    #[test]
    fn test_config_from_str_parses_successfully() {
        let config = Config::from_str(TEST_CONFIG).expect("should parse config");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_body_bytes, 1_048_576);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_config_parses_model_routes() {
        let config = Config::from_str(TEST_CONFIG).expect("should parse config");
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[0].name(), "cogvlm-chat-17b");
        assert_eq!(config.models[0].endpoint_env(), "COGVLM_ENDPOINT");
        assert_eq!(config.models[1].name(), "qwenvl-chat");
    }

    #[test]
    fn test_config_with_only_models_uses_defaults() {
        let config = Config::from_str(
            r#"
[[models]]
name = "m"
endpoint_env = "M_ENDPOINT"
"#,
        )
        .expect("should parse config");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.max_body_bytes, 20 * 1024 * 1024);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_default_config_has_builtin_models() {
        let config = Config::default();
        config.validate().expect("default config should be valid");
        let names: Vec<_> = config.models.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["cogvlm-chat-17b", "qwenvl-chat"]);
    }

    #[test]
    fn test_config_validation_empty_models_fails() {
        let result = Config::from_str("models = []");
        let err = result.expect_err("empty model table should fail");
        assert!(err.to_string().contains("no models configured"));
    }

    #[test]
    fn test_config_validation_duplicate_model_fails() {
        let result = Config::from_str(
            r#"
[[models]]
name = "dup"
endpoint_env = "A"

[[models]]
name = "dup"
endpoint_env = "B"
"#,
        );
        let err = result.expect_err("duplicate model should fail");
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_config_validation_bad_env_name_fails() {
        for bad in ["", "1ENDPOINT", "MY-ENDPOINT", "MY ENDPOINT"] {
            let config = Config {
                models: vec![ModelRoute::new("m", bad)],
                ..Config::default()
            };
            assert!(
                config.validate().is_err(),
                "endpoint_env {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_config_validation_blank_model_name_fails() {
        let config = Config {
            models: vec![ModelRoute::new("  ", "ENDPOINT")],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_host_fails() {
        let mut config = Config::default();
        config.server.host = "localhost".to_string();
        let err = config.validate().expect_err("hostname should be rejected");
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_config_validation_zero_body_limit_fails() {
        let mut config = Config::default();
        config.server.max_body_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_socket_addr_uses_host_and_port() {
        let config = Config::from_str(TEST_CONFIG).expect("should parse config");
        assert_eq!(
            config.server.socket_addr(),
            "127.0.0.1:9000".parse::<SocketAddr>().unwrap()
        );
    }
}
