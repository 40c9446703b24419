//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, per-route stage lists)
//!     → middleware/recovery.rs (panic guard)
//!     → middleware/instrument.rs (root span, request counter, request ID)
//!     → handlers.rs (business logic, child spans, failure injection)
//!     → response to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod server;

pub use server::{AppState, HttpServer};
