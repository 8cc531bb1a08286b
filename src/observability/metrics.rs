//! Metrics collection and exposition.
//!
//! # Metrics
//! - `frontend_requests_total` (counter): requests by method, path, status
//! - `frontend_request_duration_seconds` (histogram): latency by path
//! - `frontend_control_outcomes_total` (counter): `/control` results by outcome
//! - `frontend_health_state` (gauge): 0=starting, 1=healthy, 2=draining
//! - `frontend_active_connections` (gauge): open client connections
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::health::HealthState;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let path = path_label(path);

    counter!(
        "frontend_requests_total",
        "method" => method_label(method),
        "path" => path,
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("frontend_request_duration_seconds", "path" => path)
        .record(start.elapsed().as_secs_f64());
}

// Label values are a fixed set: anything unrecognised is "other".

fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "CONNECT" => "CONNECT",
        "OPTIONS" => "OPTIONS",
        "TRACE" => "TRACE",
        "PATCH" => "PATCH",
        _ => "other",
    }
}

fn path_label(path: &str) -> &'static str {
    match path {
        "/healthz" => "/healthz",
        "/server.pem" => "/server.pem",
        "/control" => "/control",
        _ => "other",
    }
}

pub fn record_control_outcome(outcome: &'static str) {
    counter!("frontend_control_outcomes_total", "outcome" => outcome).increment(1);
}

pub fn set_health_state(state: HealthState) {
    gauge!("frontend_health_state").set(state as u8 as f64);
}

pub fn set_active_connections(count: u64) {
    gauge!("frontend_active_connections").set(count as f64);
}
