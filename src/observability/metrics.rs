//! Metrics collection and exposition.
//!
//! # Metrics
//! - `treemux_dispatch_total` (counter): requests answered, by outcome
//!   (`handler` or `fallback`)
//! - `treemux_route_build_errors_total` (counter): route tables rejected
//!   while building a tree

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handler,
    Fallback,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Handler => "handler",
            Outcome::Fallback => "fallback",
        }
    }
}

pub fn record_dispatch(outcome: Outcome) {
    metrics::counter!("treemux_dispatch_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_route_build_error() {
    metrics::counter!("treemux_route_build_errors_total").increment(1);
}

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}
