//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use quest_entitlements::NavState;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "quest_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "quest_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "quest_http_requests_in_flight";

    // Gating
    pub const GATING_DECISIONS_TOTAL: &str = "quest_gating_decisions_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "quest_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Endpoint label values for gating decisions.
pub mod sources {
    pub const EVALUATE: &str = "evaluate";
    pub const NAVIGATION: &str = "navigation";
}

/// Record the gating state computed for an action.
///
/// Only the endpoint and the state are labels; action ids in evaluate
/// requests are chosen by the caller.
pub fn record_gating_decision(source: &'static str, state: &NavState) {
    let labels = [("source", source), ("state", state.as_str())];
    counter!(names::GATING_DECISIONS_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Replace business IDs in a path with a placeholder.
fn sanitize_path(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').collect();
    for i in 1..segments.len() {
        if segments[i - 1] == "businesses" && !segments[i].is_empty() {
            segments[i] = ":business_id";
        }
    }
    segments.join("/")
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/businesses/b-123/entitlements"),
            "/api/businesses/:business_id/entitlements"
        );
        assert_eq!(sanitize_path("/api/entitlements/evaluate"), "/api/entitlements/evaluate");
        assert_eq!(sanitize_path("/api/businesses/"), "/api/businesses/");
    }
}
