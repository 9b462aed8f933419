//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or full EnvFilter syntax)
    pub log_level: String,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Include file and line of the call site
    pub with_location: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "rollup-exchange".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            with_location: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RX_SERVICE_NAME`: Service name (default: rollup-exchange)
    /// - `RX_LOG_LEVEL` or `RUST_LOG`: Filter directive (default: info)
    /// - `RX_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    /// - `RX_LOG_LOCATION`: Include file and line (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            lookup("KUBERNETES_SERVICE_HOST").is_some() || lookup("DOCKER_CONTAINER").is_some();
        let flag = |key: &str| {
            lookup(key).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        };

        Self {
            service_name: lookup("RX_SERVICE_NAME")
                .unwrap_or_else(|| "rollup-exchange".to_string()),

            log_level: lookup("RX_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| "info".to_string()),

            json_logs: flag("RX_JSON_LOGS").unwrap_or(is_container),

            with_location: flag("RX_LOG_LOCATION").unwrap_or(false),
        }
    }

    /// Configuration for a single component, e.g. `("02", "exchange")`.
    pub fn for_component(component_id: &str, component_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("rx-{}-{}", component_id, component_name);
        config
    }
}
