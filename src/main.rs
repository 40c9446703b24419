//! Instrumented HTTP API service.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌───────────────────────────────────────────────┐
//!                          │                 OTEL-API SERVICE              │
//!                          │                                               │
//!     Client Request       │  ┌──────────┐   ┌──────────────┐              │
//!     ─────────────────────┼─▶│ recovery │──▶│ instrument   │              │
//!                          │  │ (panic   │   │ (root span + │              │
//!                          │  │  guard)  │   │  counter)    │              │
//!                          │  └──────────┘   └──────┬───────┘              │
//!                          │                        ▼                      │
//!                          │                 ┌──────────────┐              │
//!                          │                 │   handlers   │              │
//!                          │                 │ home / user  │              │
//!                          │                 │   / health   │              │
//!                          │                 └──────┬───────┘              │
//!                          │                        │ spans + metrics      │
//!                          │                        ▼                      │
//!                          │                 ┌──────────────┐     OTLP     │
//!                          │                 │   emitter    │─────────────▶│──▶ Collector
//!                          │                 │  (batched)   │  Prometheus  │
//!     Client Response      │                 └──────────────┘   scrape ───▶│──▶ /metrics
//!     ◀────────────────────┼────────────────────────────────────────────── │
//!                          └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use otel_api::config::{load_config, ServiceConfig};
use otel_api::http::HttpServer;
use otel_api::lifecycle::Shutdown;
use otel_api::telemetry::init_telemetry;

/// How long the final telemetry flush may take before the process exits
/// anyway.
const FLUSH_DEADLINE: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "otel-api", about = "HTTP service instrumented with OpenTelemetry")]
struct Args {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    let emitter = init_telemetry(&config.telemetry)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        error_rate = config.injection.error_rate,
        "configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "listening for connections");

    let shutdown = std::sync::Arc::new(Shutdown::new());
    let signal = shutdown.clone();
    tokio::spawn(async move { signal.on_signal().await });

    let server = HttpServer::new(&config, emitter.clone());
    let served = server.run(listener, shutdown.subscribe()).await;

    // Drain buffered spans before exit, including when serving errored.
    emitter.shutdown(FLUSH_DEADLINE).await;
    served?;

    tracing::info!("shutdown complete");
    Ok(())
}
