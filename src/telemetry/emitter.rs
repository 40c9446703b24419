//! The telemetry emitter handle.
//!
//! Wraps an SDK tracer provider behind a narrow interface: start/end spans,
//! record counters and histograms, flush on shutdown. The handle is cheap to
//! clone and safe for concurrent use from any number of in-flight requests;
//! all buffering and locking lives inside the SDK.

use std::borrow::Cow;
use std::time::Duration;

use metrics::{counter, histogram, Label};
use opentelemetry::trace::{TraceContextExt, Tracer as _, TracerProvider as _};
use opentelemetry::{Context, KeyValue, Value};
use opentelemetry_sdk::trace::{Span, Tracer, TracerProvider};

/// Instrumentation scope reported on every span.
const SCOPE_NAME: &str = "otel-api";

/// Handle for emitting spans and measurements.
///
/// Constructed once at startup (see [`crate::telemetry::bootstrap`]) and
/// threaded by value through the composition root into middleware and
/// handlers.
#[derive(Clone)]
pub struct Emitter {
    provider: TracerProvider,
    tracer: Tracer,
}

impl Emitter {
    /// Create an emitter backed by the given tracer provider.
    pub fn new(provider: TracerProvider) -> Self {
        let tracer = provider.tracer(SCOPE_NAME);
        Self { provider, tracer }
    }

    /// Start a span. With `parent: None` the span roots a new trace;
    /// otherwise it nests under the span carried by `parent`.
    pub fn start_span(
        &self,
        name: impl Into<Cow<'static, str>>,
        parent: Option<&Context>,
    ) -> SpanHandle {
        let span = match parent {
            Some(cx) => self.tracer.start_with_context(name, cx),
            // An empty context keeps ambient task-local state out of the trace.
            None => self.tracer.start_with_context(name, &Context::new()),
        };
        SpanHandle::new(span)
    }

    /// Increment a counter by `delta`, tagged with `tags`.
    pub fn record_counter(&self, name: &'static str, delta: u64, tags: &[(&'static str, &str)]) {
        counter!(name, to_labels(tags)).increment(delta);
    }

    /// Record one histogram observation, tagged with `tags`.
    pub fn record_histogram(&self, name: &'static str, value: f64, tags: &[(&'static str, &str)]) {
        histogram!(name, to_labels(tags)).record(value);
    }

    /// Flush buffered spans, giving up after `deadline`.
    ///
    /// Emission is best-effort: a flush failure is logged and swallowed so
    /// process exit is never held hostage by a dead collector.
    pub async fn shutdown(self, deadline: Duration) {
        let provider = self.provider;
        let flush = tokio::task::spawn_blocking(move || provider.shutdown());
        match tokio::time::timeout(deadline, flush).await {
            Ok(Ok(Ok(()))) => tracing::debug!("telemetry flushed"),
            Ok(Ok(Err(e))) => tracing::error!(error = %e, "failed to shut down tracer provider"),
            Ok(Err(e)) => tracing::error!(error = %e, "telemetry flush task failed"),
            Err(_) => tracing::warn!(deadline = ?deadline, "telemetry flush timed out"),
        }
    }
}

fn to_labels(tags: &[(&'static str, &str)]) -> Vec<Label> {
    tags.iter()
        .map(|&(key, value)| Label::new(key, value.to_string()))
        .collect()
}

/// An open span.
///
/// Attributes may be added any time before the span ends. Ending is
/// scoped-acquisition: if the handle is dropped without an explicit
/// [`SpanHandle::end`] (early return, unwind), the span still closes when
/// its last context clone is dropped, with that drop time as its end time.
/// Every opened span therefore closes exactly once on every exit path.
pub struct SpanHandle {
    cx: Context,
}

impl SpanHandle {
    fn new(span: Span) -> Self {
        Self {
            cx: Context::new().with_span(span),
        }
    }

    /// Attach a key-value attribute to the span.
    pub fn set_attribute(&mut self, key: &'static str, value: impl Into<Value>) {
        self.cx.span().set_attribute(KeyValue::new(key, value));
    }

    /// Context carrying this span, for parenting child spans. The span
    /// itself rides in the context, so children record an in-process
    /// parent link rather than a remote one.
    pub fn context(&self) -> Context {
        self.cx.clone()
    }

    /// End the span now.
    pub fn end(self) {
        self.cx.span().end();
    }
}
