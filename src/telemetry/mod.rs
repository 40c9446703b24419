//! Telemetry subsystem.
//!
//! # Data Flow
//! ```text
//! Middleware + handlers produce:
//!     → emitter.rs (span open/close, counter and histogram updates)
//!     → metrics.rs (metric names + registration)
//!
//! Consumers:
//!     → OTLP collector (batched span export, bootstrap.rs)
//!     → Prometheus scrape endpoint (metrics exposition)
//!     → stdout (structured logs via tracing-subscriber)
//! ```
//!
//! # Design Decisions
//! - One explicitly constructed `Emitter` handle per process, cloned into
//!   the request pipeline; no hidden global providers
//! - Span closure is drop-bound so unwinding still closes spans
//! - Metric updates are fire-and-forget; export failure never fails a request

pub mod bootstrap;
pub mod emitter;
pub mod metrics;

pub use bootstrap::{init_telemetry, TelemetryError};
pub use emitter::{Emitter, SpanHandle};
