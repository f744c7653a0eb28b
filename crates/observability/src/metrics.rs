//! Prometheus metrics infrastructure
//!
//! Metrics are recorded through the `metrics` facade. Without an installed
//! exporter every call is a no-op, so recording is always safe.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Start the Prometheus exporter on `0.0.0.0:<port>/metrics`.
///
/// # Errors
///
/// Fails if the address is invalid or an exporter is already installed.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// HTTP request metrics for one server.
///
/// # Metrics
///
/// * `http_requests_total{server, route, status}` - Completed requests
/// * `http_request_duration_seconds{server, route}` - Request latency
#[derive(Clone, Debug)]
pub struct RequestMetrics {
    server_name: String,
}

impl RequestMetrics {
    pub fn new(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
        }
    }

    /// Record a completed request.
    ///
    /// `route` should be the matched route template (e.g.
    /// `/spectrometers/:device_id/spectrum`), not the raw path, to keep
    /// label cardinality bounded.
    pub fn record_request(&self, route: &str, duration: Duration, status_code: u16) {
        counter!(
            "http_requests_total",
            "server" => self.server_name.clone(),
            "route" => route.to_string(),
            "status" => status_code.to_string()
        )
        .increment(1);
        histogram!(
            "http_request_duration_seconds",
            "server" => self.server_name.clone(),
            "route" => route.to_string()
        )
        .record(duration.as_secs_f64());
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_exporter_is_noop() {
        let metrics = RequestMetrics::new("test");
        metrics.record_request("/spectrometers", Duration::from_millis(3), 200);
        assert_eq!(metrics.server_name(), "test");
    }
}
