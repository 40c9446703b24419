//! Lifecycle management subsystem.
//!
//! ```text
//! Startup:  load config → init telemetry → bind listener → serve
//! Shutdown: SIGINT → stop accepting → drain → flush telemetry → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
