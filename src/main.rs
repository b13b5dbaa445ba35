//! chatrelay HTTP server and companion client
//!
//! `chatrelay serve` (the default) starts the relay; `chatrelay config` prints
//! a configuration template; `chatrelay send` posts a vision request to a relay.

use chatrelay::{
    cli::{Cli, Command, generate_config_template},
    client::{RelayClient, VisionRequest},
    config::Config,
    handlers::{self, AppState},
    registry::EndpointRegistry,
    telemetry,
};
use clap::Parser;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cli.config.as_deref()).await,
        Command::Config { output } => {
            let template = generate_config_template();
            match output {
                Some(path) => {
                    std::fs::write(&path, template)?;
                    println!("Wrote configuration template to {}", path);
                }
                None => print!("{}", template),
            }
            Ok(())
        }
        Command::Send {
            url,
            image,
            model,
            prompt,
            temperature,
            top_p,
            max_tokens,
            api_key,
            repeat,
        } => {
            let request = VisionRequest::from_image_file(&image)?
                .with_model(model)
                .with_prompt(prompt)
                .with_temperature(temperature)
                .with_top_p(top_p)
                .with_max_tokens(max_tokens);

            let client = RelayClient::new(url, api_key)?;
            println!("Sending {} request(s) for model {}", repeat, request.model());
            let body = request.to_json();
            let (results, elapsed) = client.send_concurrent(&body, repeat.into()).await;
            for result in results {
                let outcome = result?;
                println!("{} {}", outcome.status, outcome.body);
            }
            println!("Time taken: {} seconds", elapsed.as_secs_f64());
            Ok(())
        }
    }
}

async fn serve(config_path: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    telemetry::init(&config.observability.log_level);

    let registry = EndpointRegistry::from_env(&config)?;
    if registry.is_empty() {
        tracing::warn!("No model endpoints resolved; every chat request will return 404");
    }
    tracing::info!(
        models = ?registry.models(),
        "Endpoint registry built"
    );

    let addr = config.server.socket_addr();
    let state = AppState::new(Arc::new(config), registry)?;
    let app = handlers::router(state);

    tracing::info!("Starting chatrelay server on {}", addr);
    tracing::info!("Chat completions at http://{}/v1/chat/completions", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
