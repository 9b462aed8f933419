//! # Rollup Exchange Telemetry
//!
//! Log setup shared by binaries and test harnesses.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rx_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!
//!     // Exchange events are now logged
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RX_SERVICE_NAME` | `rollup-exchange` | Service name in the startup line |
//! | `RX_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directive |
//! | `RX_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `RX_LOG_LOCATION` | `false` | File and line of each event |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<(), TelemetryError> {
    init_tracing(&config)
}

/// Initialize logging for tests: output goes through the test harness
/// capture, and an already installed subscriber is left alone.
pub fn init_test_telemetry() {
    let config = TelemetryConfig::from_env();
    if let Ok(filter) = build_filter(&config) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}
