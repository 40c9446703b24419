//! Metric names and registration.
//!
//! Prometheus naming conventions; metrics are tagged with the endpoint they
//! belong to where that is meaningful.

use metrics::{describe_counter, describe_histogram};

/// Requests received, tagged by `endpoint`. Incremented once per request by
/// the instrumentation middleware.
pub const API_REQUESTS_TOTAL: &str = "api_requests_total";

/// Injected home-handler delay in milliseconds, tagged by `endpoint`.
pub const API_HOME_LATENCY_MS: &str = "api_home_latency_milliseconds";

/// User-handler invocations.
pub const API_USER_REQUESTS_TOTAL: &str = "api_user_requests_total";

/// Simulated user-handler errors, tagged by `error.type`.
pub const API_USER_ERRORS_TOTAL: &str = "api_user_errors_total";

/// Register metric descriptions. Called once during telemetry bootstrap.
pub fn register_metrics() {
    describe_counter!(API_REQUESTS_TOTAL, "Number of HTTP requests received");
    describe_histogram!(
        API_HOME_LATENCY_MS,
        "Injected home-handler latency in milliseconds"
    );
    describe_counter!(
        API_USER_REQUESTS_TOTAL,
        "Number of user-handler invocations"
    );
    describe_counter!(API_USER_ERRORS_TOTAL, "Number of simulated user errors");
}
