//! Instrumented HTTP API library.
//!
//! A minimal service whose request pipeline emits distributed traces and
//! metrics for every request and injects synthetic latency and errors to
//! exercise the telemetry path.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod telemetry;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use telemetry::Emitter;
