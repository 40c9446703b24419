//! Instrumentation middleware.
//!
//! Sits closest to the handler. Opens the root span for the request, counts
//! it, and threads the open span to the handler through request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use opentelemetry::Context;
use uuid::Uuid;

use crate::http::server::AppState;
use crate::telemetry::metrics;

/// Route label used for the root span name and the `endpoint` metric tag.
#[derive(Clone, Copy, Debug)]
pub struct RouteLabel(pub &'static str);

/// Per-request carrier handed to handlers.
///
/// Created here, one per inbound request, never shared across requests.
#[derive(Clone)]
pub struct RequestContext {
    /// Context carrying the open root span; parent for handler child spans.
    pub trace: Context,
    /// Correlation ID for log lines.
    pub request_id: Uuid,
}

/// Wrap a handler with a root span and a request counter.
///
/// The root span is closed after the inner stages return, whatever the
/// outcome. On a panic the unwinding future drops the span handle, which
/// ends the span just the same; closure is bound to scope exit, not to
/// normal return. The inner response is returned unaltered.
pub async fn instrument_request(
    State((state, RouteLabel(label))): State<(AppState, RouteLabel)>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut span = state.telemetry.start_span(label, None);
    let request_id = Uuid::new_v4();
    span.set_attribute("request.id", request_id.to_string());

    state
        .telemetry
        .record_counter(metrics::API_REQUESTS_TOTAL, 1, &[("endpoint", label)]);

    tracing::debug!(
        request_id = %request_id,
        endpoint = label,
        method = %request.method(),
        "request received"
    );

    request.extensions_mut().insert(RequestContext {
        trace: span.context(),
        request_id,
    });

    let response = next.run(request).await;

    span.set_attribute("http.status_code", response.status().as_u16() as i64);
    span.end();
    response
}
