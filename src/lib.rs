//! chatrelay - model-keyed relay for chat completion backends
//!
//! Accepts OpenAI-style chat completion requests, resolves the backend
//! configured for the request's `model`, and forwards the body unchanged.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod registry;
pub mod relay;
pub mod telemetry;
