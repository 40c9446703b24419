//! Telemetry bootstrap: tracer provider, metrics exporter, log subscriber.
//!
//! Runs once at startup, before the listener binds. Produces the process-wide
//! [`Emitter`] handle; nothing here is reachable from the request path.

use opentelemetry::trace::TraceError;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::TelemetryConfig;
use crate::telemetry::emitter::Emitter;
use crate::telemetry::metrics::register_metrics;

/// Error type for telemetry initialization failures.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("failed to initialize OTLP trace exporter: {0}")]
    TracerInit(#[from] TraceError),
    #[error("failed to initialize Prometheus exporter: {0}")]
    PrometheusInit(String),
    #[error("invalid metrics address {addr}: {reason}")]
    MetricsAddress { addr: String, reason: String },
    #[error("failed to set global subscriber: {0}")]
    SubscriberInit(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialize the telemetry subsystems and return the emitter handle.
///
/// - Installs the tracing subscriber (EnvFilter + fmt layer).
/// - Builds the tracer provider. When `otlp_endpoint` is unset, spans are
///   recorded against a provider with no exporter: telemetry degrades, the
///   service does not.
/// - Installs the Prometheus scrape endpoint when metrics are enabled.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<Emitter, TelemetryError> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "otel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    let resource = Resource::new(vec![
        KeyValue::new(SERVICE_NAME, config.service_name.clone()),
        KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
    ]);

    let mut builder = TracerProvider::builder()
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource);

    if let Some(endpoint) = &config.otlp_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;
        builder = builder.with_batch_exporter(exporter, runtime::Tokio);
        tracing::info!(endpoint = %endpoint, "OTLP span export enabled");
    } else {
        tracing::warn!("no OTLP endpoint configured, spans will not be exported");
    }

    let provider = builder.build();

    if config.metrics_enabled {
        let addr: std::net::SocketAddr = config.metrics_address.parse().map_err(
            |e: std::net::AddrParseError| TelemetryError::MetricsAddress {
                addr: config.metrics_address.clone(),
                reason: e.to_string(),
            },
        )?;
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()
            .map_err(|e| TelemetryError::PrometheusInit(e.to_string()))?;
        register_metrics();
        tracing::info!(address = %addr, "Prometheus metrics endpoint enabled");
    }

    Ok(Emitter::new(provider))
}
