//! Metrics collection and exposition.
//!
//! # Metrics
//! - `grit_actions_total` (counter): user actions by action and outcome
//! - `grit_goals_loaded` (gauge): size of the latest goal snapshot
//! - `grit_rpc_health` (gauge): 1=reachable, 0=unreachable
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished (or refused) user action.
pub fn record_action(action: &'static str, outcome: &'static str) {
    ::metrics::counter!("grit_actions_total", "action" => action, "outcome" => outcome)
        .increment(1);
}

pub fn record_goals_loaded(count: usize) {
    ::metrics::gauge!("grit_goals_loaded").set(count as f64);
}

pub fn record_rpc_health(healthy: bool) {
    ::metrics::gauge!("grit_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}
