//! Route handlers.
//!
//! Business logic with deliberate failure injection: synthetic latency and a
//! probabilistic error path, each recorded as spans and measurements so the
//! telemetry pipeline has something real to carry. Delays use non-blocking
//! sleeps; concurrent requests keep making progress.

use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension,
};

use crate::http::middleware::RequestContext;
use crate::http::server::AppState;
use crate::telemetry::metrics;

pub const HOME_BODY: &str = "Hello, OpenTelemetry with Collector!";
pub const USER_BODY: &str = r#"{"id": 1, "name": "Test User"}"#;
pub const USER_ERROR_BODY: &str = "An error occurred";

/// `GET /`: fixed body after a uniformly drawn delay from
/// `[0, home_delay_max_ms)`, recorded as a span attribute and a histogram
/// observation.
pub async fn home_handler(
    State(state): State<AppState>,
    Extension(rcx): Extension<RequestContext>,
) -> impl IntoResponse {
    let mut span = state.telemetry.start_span("home-operation", Some(&rcx.trace));

    let delay_ms = draw_delay_ms(state.injection.home_delay_max_ms);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    span.set_attribute("sleep.time.ms", delay_ms as i64);

    state.telemetry.record_histogram(
        metrics::API_HOME_LATENCY_MS,
        delay_ms as f64,
        &[("endpoint", "home")],
    );

    span.end();
    HOME_BODY
}

/// `GET /user`: nested `database-query` span simulating a backend call,
/// then either the fixed success body or, with probability `error_rate`, a
/// simulated error: telemetry-recorded, surfaced as a 500, and not a fault.
pub async fn user_handler(
    State(state): State<AppState>,
    Extension(rcx): Extension<RequestContext>,
) -> Response {
    let mut span = state.telemetry.start_span("user-operation", Some(&rcx.trace));
    let operation_cx = span.context();

    let query_span = state
        .telemetry
        .start_span("database-query", Some(&operation_cx));
    let delay_ms = draw_delay_ms(state.injection.backend_delay_max_ms);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    query_span.end();

    state
        .telemetry
        .record_counter(metrics::API_USER_REQUESTS_TOTAL, 1, &[]);

    if fastrand::f64() < state.injection.error_rate {
        span.set_attribute("error", true);
        span.set_attribute("error.message", "Simulated random error");
        state.telemetry.record_counter(
            metrics::API_USER_ERRORS_TOTAL,
            1,
            &[("error.type", "simulated")],
        );
        // Expected business failure: the span still ends normally.
        span.end();
        return (StatusCode::INTERNAL_SERVER_ERROR, USER_ERROR_BODY).into_response();
    }

    span.end();
    USER_BODY.into_response()
}

/// `GET /health`: liveness probe. Never suspends, never fails, touches no
/// shared state; telemetry is limited to what the instrumentation stage adds.
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn draw_delay_ms(max_exclusive: u64) -> u64 {
    if max_exclusive == 0 {
        0
    } else {
        fastrand::u64(0..max_exclusive)
    }
}
