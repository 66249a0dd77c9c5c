//! Metrics collection and exposition.
//!
//! # Metrics
//! - `disposable_refresh_total` (counter): refresh cycles by outcome
//! - `disposable_source_fetch_total` (counter): per-source fetches by outcome
//! - `disposable_domains_loaded` (gauge): size of the served list
//! - `disposable_cache_ready` (gauge): 1 once a list has been loaded
//! - `disposable_lookups_total` (counter): lookups by verdict
//! - `webhook_requests_total` (counter): HTTP requests by endpoint, status
//! - `webhook_request_duration_seconds` (histogram): handler latency
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_refresh(outcome: &'static str) {
    metrics::counter!("disposable_refresh_total", "outcome" => outcome).increment(1);
}

pub fn record_source_fetch(outcome: &'static str) {
    metrics::counter!("disposable_source_fetch_total", "outcome" => outcome).increment(1);
}

pub fn record_domains_loaded(count: usize) {
    metrics::gauge!("disposable_domains_loaded").set(count as f64);
}

pub fn record_cache_ready(ready: bool) {
    metrics::gauge!("disposable_cache_ready").set(if ready { 1.0 } else { 0.0 });
}

pub fn record_lookup(verdict: &'static str) {
    metrics::counter!("disposable_lookups_total", "verdict" => verdict).increment(1);
}

pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "webhook_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("webhook_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}
