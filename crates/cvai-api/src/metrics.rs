//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use cvai_models::{Mode, Provider};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "cvai_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "cvai_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "cvai_http_requests_in_flight";

    // Generation metrics
    pub const GENERATIONS_TOTAL: &str = "cvai_generations_total";
    pub const GENERATION_DURATION_SECONDS: &str = "cvai_generation_duration_seconds";
    pub const QUOTA_REJECTIONS_TOTAL: &str = "cvai_quota_rejections_total";
    pub const USAGE_RECORD_FAILURES_TOTAL: &str = "cvai_usage_record_failures_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "cvai_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a completed generation.
pub fn record_generation(provider: Provider, mode: Mode, duration_secs: f64) {
    let labels = [
        ("provider", provider.as_str().to_string()),
        ("mode", mode.as_str().to_string()),
    ];
    counter!(names::GENERATIONS_TOTAL, &labels).increment(1);
    histogram!(names::GENERATION_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a request rejected at the quota gate.
pub fn record_quota_rejection(mode: Mode) {
    let labels = [("mode", mode.as_str().to_string())];
    counter!(names::QUOTA_REJECTIONS_TOTAL, &labels).increment(1);
}

/// Record a usage increment that failed after a successful generation.
pub fn record_usage_record_failure(mode: Mode) {
    let labels = [("mode", mode.as_str().to_string())];
    counter!(names::USAGE_RECORD_FAILURES_TOTAL, &labels).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    // Increment in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    // Decrement in-flight counter
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
