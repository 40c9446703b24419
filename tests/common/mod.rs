//! Shared utilities for integration testing.

use std::net::SocketAddr;

use opentelemetry_sdk::trace::TracerProvider;
use otel_api::config::ServiceConfig;
use otel_api::{Emitter, HttpServer, Shutdown};

/// Emitter whose spans go nowhere; endpoint tests don't inspect traces.
#[allow(dead_code)]
pub fn null_emitter() -> Emitter {
    Emitter::new(TracerProvider::builder().build())
}

/// Start the service on an ephemeral port and return its address plus the
/// shutdown handle keeping it alive.
#[allow(dead_code)]
pub async fn spawn_service(config: ServiceConfig) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, null_emitter());
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
