//! Prometheus metrics collection for chatrelay
//!
//! Tracks relay outcomes per model and the latency of backend calls.
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Label used for requests whose model did not resolve
///
/// Unknown model names are caller-controlled; collapsing them keeps label
/// cardinality bounded by the configured model table.
pub const UNKNOWN_MODEL_LABEL: &str = "unknown";

/// Final outcome of one relayed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Backend answered 2xx and its body was returned
    Forwarded,
    /// No backend configured for the requested model
    ModelNotFound,
    /// Transport error or non-2xx backend status
    ForwardFailed,
}

impl Outcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Forwarded => "forwarded",
            Outcome::ModelNotFound => "model_not_found",
            Outcome::ForwardFailed => "forward_failed",
        }
    }
}

/// Metrics collector for chatrelay
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    forward_duration: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        // Cardinality: (configured models + 1) x 3 outcomes
        let requests_total = IntCounterVec::new(
            Opts::new(
                "chatrelay_requests_total",
                "Total number of chat completion requests by model and outcome",
            ),
            &["model", "outcome"],
        )?;

        let forward_duration = HistogramVec::new(
            HistogramOpts::new(
                "chatrelay_forward_duration_ms",
                "Backend round-trip latency in milliseconds",
            )
            .buckets(vec![
                10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
            ]),
            &["model"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(forward_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            forward_duration,
        })
    }

    /// Record the outcome of one request
    pub fn record_request(&self, model: &str, outcome: Outcome) -> Result<(), prometheus::Error> {
        self.requests_total
            .get_metric_with_label_values(&[model, outcome.as_str()])?
            .inc();
        Ok(())
    }

    /// Record backend latency
    ///
    /// # Errors
    ///
    /// Returns an error if `duration_ms` is negative or not finite.
    pub fn record_forward_duration(
        &self,
        model: &str,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Invalid forward duration: {} (must be finite and non-negative)",
                duration_ms
            )));
        }

        self.forward_duration
            .get_metric_with_label_values(&[model])?
            .observe(duration_ms);
        Ok(())
    }

    /// Read back a request counter
    pub fn request_count(&self, model: &str, outcome: Outcome) -> u64 {
        self.requests_total
            .get_metric_with_label_values(&[model, outcome.as_str()])
            .map(|c| c.get())
            .unwrap_or(0)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        tracing::debug!(
            metric_family_count = metric_families.len(),
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Metrics output is not valid UTF-8: {}", e))
        })
    }
}
