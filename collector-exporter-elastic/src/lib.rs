//! Elastic APM exporter for collector pipelines.
//!
//! This crate registers the `elastic` exporter type with a collector host and
//! builds trace exporters for it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  Host Registry  │────>│ Elastic Factory │────>│ Trace Exporter  │
//! │ (config blocks) │     │ (type, configs) │     │  (APM server)   │
//! └─────────────────┘     └─────────────────┘     └─────────────────┘
//! ```
//!
//! # Supported Signals
//!
//! - **Traces**: built by [`exporter::new_elastic_trace_exporter`]
//! - **Metrics**: not supported, the factory reports `Error::DataTypeNotSupported`
//! - **Logs**: not supported
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use collector_common::{DataType, ExporterRegistry};
//! use collector_exporter_elastic::ElasticExporterFactory;
//!
//! let mut registry = ExporterRegistry::new();
//! registry.register(Arc::new(ElasticExporterFactory::new()))?;
//! let cfg = registry.load_config("elastic", &overrides)?;
//! let exporter = registry.build(&ctx, params, cfg.as_ref(), DataType::Traces)?;
//! ```
//!
//! # Configuration
//!
//! See [`config::Config`] for configuration options.

pub mod config;
pub mod error;
pub mod exporter;
pub mod factory;

pub use config::Config;
pub use error::ElasticError;
pub use exporter::{ElasticTraceExporter, ExporterStats};
pub use factory::{ElasticExporterFactory, TYPE, TYPE_STR};
