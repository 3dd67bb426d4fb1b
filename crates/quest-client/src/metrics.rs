//! Business API client metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total backend requests by operation and status.
    pub const REQUESTS_TOTAL: &str = "quest_client_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "quest_client_latency_seconds";

    /// Snapshot refreshes by outcome.
    pub const SNAPSHOT_REFRESHES_TOTAL: &str = "quest_client_snapshot_refreshes_total";
}

/// Record metrics for a completed backend request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a snapshot refresh attempt.
pub fn record_snapshot_refresh(success: bool) {
    let outcome = if success { "ok" } else { "error" };
    counter!(names::SNAPSHOT_REFRESHES_TOTAL, "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("fetch_snapshot", 200, 12.5);
        record_snapshot_refresh(false);
    }
}
