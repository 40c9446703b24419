//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared with the composition root and telemetry bootstrap
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults so an empty config file is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{InjectionConfig, ListenerConfig, ServiceConfig, TelemetryConfig};
