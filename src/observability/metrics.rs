//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_routing_decisions_total` (counter): decisions by kind
//! - `edge_requests_total` (counter): requests by method, status
//! - `edge_request_duration_seconds` (histogram): latency distribution
//! - `edge_upstream_errors_total` (counter): failed renderer calls
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter runs on its own listener

use axum::http::Method;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(kind: &'static str) {
    counter!("edge_routing_decisions_total", "decision" => kind).increment(1);
}

/// Bounded label for a request method; extension methods collapse to "other".
pub fn method_label(method: &Method) -> &'static str {
    match method.as_str() {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "PATCH" => "PATCH",
        "OPTIONS" => "OPTIONS",
        "CONNECT" => "CONNECT",
        "TRACE" => "TRACE",
        _ => "other",
    }
}

pub fn record_request(method: &'static str, status: u16, start: Instant) {
    counter!(
        "edge_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("edge_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error() {
    counter!("edge_upstream_errors_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_label_is_bounded() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::DELETE), "DELETE");

        let custom = Method::from_bytes(b"PURGE-EVERYTHING-123").unwrap();
        assert_eq!(method_label(&custom), "other");
    }
}
