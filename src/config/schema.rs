//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Telemetry backend settings.
    pub telemetry: TelemetryConfig,

    /// Failure injection knobs.
    pub injection: InjectionConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Telemetry backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name reported on exported spans.
    pub service_name: String,

    /// OTLP collector endpoint (e.g., "http://otel-collector:4317").
    /// When unset, spans are recorded but not exported.
    pub otlp_endpoint: Option<String>,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address for the Prometheus scrape endpoint.
    pub metrics_address: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "otel-api".to_string(),
            otlp_endpoint: None,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Failure injection configuration.
///
/// Synthetic latency and error conditions exercising the telemetry path.
/// Delay maxima are exclusive upper bounds; a bound of 0 disables the delay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InjectionConfig {
    /// Upper bound (exclusive) for the home handler delay, in milliseconds.
    pub home_delay_max_ms: u64,

    /// Upper bound (exclusive) for the simulated backend delay in the user
    /// handler, in milliseconds.
    pub backend_delay_max_ms: u64,

    /// Probability that a user request takes the simulated error path.
    pub error_rate: f64,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            home_delay_max_ms: 100,
            backend_delay_max_ms: 200,
            error_rate: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_service_contract() {
        let config = ServiceConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.injection.home_delay_max_ms, 100);
        assert_eq!(config.injection.backend_delay_max_ms, 200);
        assert!((config.injection.error_rate - 0.2).abs() < f64::EPSILON);
        assert!(config.telemetry.otlp_endpoint.is_none());
    }

    #[test]
    fn empty_config_deserializes_to_defaults() {
        let config: ServiceConfig = toml::from_str("").unwrap();
        assert_eq!(config.telemetry.service_name, "otel-api");
        assert!(config.telemetry.metrics_enabled);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [injection]
            error_rate = 0.5
            "#,
        )
        .unwrap();
        assert!((config.injection.error_rate - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.injection.home_delay_max_ms, 100);
    }
}
