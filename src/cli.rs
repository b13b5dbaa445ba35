//! Command-line interface for chatrelay
//!
//! Provides argument parsing and subcommand handling for the chatrelay binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::client::vision::{DEFAULT_MODEL, DEFAULT_PROMPT};

/// Model-keyed relay for chat completion backends
#[derive(Parser)]
#[command(name = "chatrelay")]
#[command(version)]
#[command(about = "Model-keyed relay for chat completion backends")]
#[command(
    long_about = "chatrelay accepts OpenAI-style chat completion requests, looks up the backend \
    configured for the requested model, and forwards the request body unchanged."
)]
pub struct Cli {
    /// Path to configuration file (built-in model table if omitted)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the relay server (default)
    Serve,

    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Send a vision chat request with an embedded image to a relay
    Send {
        /// Chat completions URL of the relay
        #[arg(long, default_value = "http://localhost:8000/v1/chat/completions")]
        url: String,

        /// Image file to embed (.jpg, .jpeg, .png, .gif, .webp)
        #[arg(long)]
        image: PathBuf,

        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,

        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,

        #[arg(long, default_value_t = 0.8)]
        temperature: f64,

        #[arg(long, default_value_t = 0.9)]
        top_p: f64,

        #[arg(long, default_value_t = 1024)]
        max_tokens: u32,

        /// Bearer token sent in the Authorization header
        #[arg(long, env = "CHATRELAY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Number of identical requests to send concurrently
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
        repeat: u16,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# chatrelay configuration
#
# Backend URLs are read from environment variables at startup. Each model
# below names the variable holding its endpoint. A model whose variable is
# unset or empty answers 404 "Model not found".

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 8000

# Largest accepted request body in bytes (base64 images are large)
max_body_bytes = 20971520

# Model table: request "model" value -> environment variable with backend URL
[[models]]
name = "cogvlm-chat-17b"
endpoint_env = "COGVLM_ENDPOINT"

[[models]]
name = "qwenvl-chat"
endpoint_env = "QWENVL_ENDPOINT"

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG overrides)
log_level = "info"

# Prometheus metrics are served at /metrics on the server port
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn default_is_serve_with_builtin_config() {
        let cli = Cli::parse_from(["chatrelay"]);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn custom_config_path() {
        let cli = Cli::parse_from(["chatrelay", "--config", "custom.toml", "serve"]);
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn config_subcommand_with_output() {
        let cli = Cli::parse_from(["chatrelay", "config", "-o", "my-config.toml"]);
        assert!(matches!(
            cli.command,
            Some(Command::Config { output: Some(ref path) }) if path == "my-config.toml"
        ));
    }

    #[test]
    fn send_subcommand_defaults() {
        let cli = Cli::parse_from(["chatrelay", "send", "--image", "test.jpg"]);
        match cli.command {
            Some(Command::Send {
                url,
                image,
                model,
                temperature,
                top_p,
                max_tokens,
                repeat,
                ..
            }) => {
                assert_eq!(url, "http://localhost:8000/v1/chat/completions");
                assert_eq!(image, PathBuf::from("test.jpg"));
                assert_eq!(model, "cogvlm-chat-17b");
                assert_eq!(temperature, 0.8);
                assert_eq!(top_p, 0.9);
                assert_eq!(max_tokens, 1024);
                assert_eq!(repeat, 1);
            }
            _ => panic!("expected send subcommand"),
        }
    }

    #[test]
    fn send_subcommand_rejects_zero_repeat() {
        let result = Cli::try_parse_from(["chatrelay", "send", "--image", "a.png", "--repeat", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn send_requires_image() {
        assert!(Cli::try_parse_from(["chatrelay", "send"]).is_err());
    }

    #[test]
    fn template_is_valid_toml() {
        let result: Result<toml::Value, _> = toml::from_str(generate_config_template());
        assert!(
            result.is_ok(),
            "Template should be valid TOML: {:?}",
            result.err()
        );
    }

    #[test]
    fn template_has_all_sections() {
        let template = generate_config_template();
        assert!(template.contains("[server]"));
        assert!(template.contains("[[models]]"));
        assert!(template.contains("[observability]"));
    }
}
