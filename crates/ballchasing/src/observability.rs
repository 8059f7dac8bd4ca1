//! Tracing subscriber setup for binaries and examples built on the client.

use ballchasing_error::{BallchasingResult, ConfigError};
use std::env;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output settings.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log level filter used when `RUST_LOG` is not set (e.g. "info")
    pub log_level: String,
    /// Emit JSON lines instead of human-readable text
    pub json_logs: bool,
}

impl ObservabilityConfig {
    /// Configuration honoring `RUST_LOG`, defaulting to `info`.
    pub fn new() -> Self {
        Self {
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            json_logs: false,
        }
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON-formatted logs.
    pub fn with_json_logs(mut self, enabled: bool) -> Self {
        self.json_logs = enabled;
        self
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Install a global subscriber with the default configuration.
///
/// # Errors
///
/// Fails if the filter does not parse or a subscriber is already set.
pub fn init_tracing() -> BallchasingResult<()> {
    init_tracing_with_config(ObservabilityConfig::default())
}

/// Install a global subscriber with an env filter and a text or JSON layer.
///
/// # Errors
///
/// Fails if the filter does not parse or a subscriber is already set.
pub fn init_tracing_with_config(config: ObservabilityConfig) -> BallchasingResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| ConfigError::new(format!("Invalid log filter {}: {}", config.log_level, e)))?;

    let fmt_layer = if config.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_level(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::new(format!("Failed to install tracing subscriber: {}", e)))?;

    Ok(())
}
