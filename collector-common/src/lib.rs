//! Collector Common Library
//!
//! This crate provides the host contract that collector pipeline components implement:
//!
//! - [`signal`] - Signal kinds (`DataType`)
//! - [`config`] - Component types, exporter settings and configuration overlay
//! - [`context`] - Creation context (cancellation, deadline) and create parameters
//! - [`component`] - Component, exporter and factory traits
//! - [`pdata`] - Trace, metric and log payloads
//! - [`registry`] - Host registry routing configuration to factories
//! - [`error`] - Error types, including the unsupported signal kind error

pub mod component;
pub mod config;
pub mod context;
pub mod error;
pub mod pdata;
pub mod registry;
pub mod signal;

// Re-export commonly used types at the crate root
pub use component::{Component, ExporterFactory, LogsExporter, MetricsExporter, TraceExporter};
pub use config::{
    ComponentType, ExporterConfig, ExporterSettings, LogFormat, LoggingConfig, overlay,
};
pub use context::{BuildInfo, CancelHandle, Context, ExporterCreateParams};
pub use error::{Error, Result};
pub use pdata::{Logs, Metrics, Span, SpanKind, SpanStatus, Traces};
pub use registry::{BuildReport, BuiltExporter, ExporterRegistry};
pub use signal::DataType;

/// Install the global tracing subscriber for a host process.
///
/// Components never call this; they log under the span handed to them in
/// [`ExporterCreateParams`]. A host embedding an [`ExporterRegistry`] calls
/// it once at startup, before building exporters, so that span and the
/// registry's own events reach an output.
///
/// `RUST_LOG`, when set, takes precedence over `config.level`. Fails with
/// [`Error::Config`] if a global subscriber is already installed.
///
/// # Example
///
/// ```ignore
/// use collector_common::{ExporterRegistry, LogFormat, LoggingConfig, init_tracing};
///
/// init_tracing(&LoggingConfig { level: "info".to_string(), format: LogFormat::Json })?;
/// let mut registry = ExporterRegistry::new();
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (text, json) = match config.format {
        LogFormat::Text => (Some(fmt::layer()), None),
        LogFormat::Json => (None, Some(fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .map_err(|e| Error::config(format!("Failed to initialize tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_only_once() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Json,
        };

        init_tracing(&config).unwrap();
        let err = init_tracing(&LoggingConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("tracing")));
    }
}
