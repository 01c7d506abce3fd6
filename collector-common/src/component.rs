//! Component and factory traits implemented by exporters.

use crate::config::{ComponentType, ExporterConfig};
use crate::context::{Context, ExporterCreateParams};
use crate::error::{Error, Result};
use crate::pdata::{Logs, Metrics, Traces};
use crate::signal::DataType;

/// Lifecycle shared by every pipeline component.
///
/// The host calls `start` once before sending data and `shutdown` once when
/// the pipeline stops.
pub trait Component: Send + Sync {
    /// Type of the factory that created this component.
    fn component_type(&self) -> &ComponentType;

    fn start(&self, ctx: &Context) -> Result<()>;

    fn shutdown(&self, ctx: &Context) -> Result<()>;
}

/// Exporter accepting trace batches.
pub trait TraceExporter: Component {
    fn consume_traces(&self, ctx: &Context, traces: Traces) -> Result<()>;
}

/// Exporter accepting metric batches.
pub trait MetricsExporter: Component {
    fn consume_metrics(&self, ctx: &Context, metrics: Metrics) -> Result<()>;
}

/// Exporter accepting log batches.
pub trait LogsExporter: Component {
    fn consume_logs(&self, ctx: &Context, logs: Logs) -> Result<()>;
}

/// Registration point for one exporter type.
///
/// Each `create_*` call either returns a fully built exporter or an error,
/// never a half-initialized one. Factories hold no mutable state and may be
/// called concurrently.
pub trait ExporterFactory: Send + Sync {
    /// Type used by the host to route configuration to this factory.
    fn component_type(&self) -> ComponentType;

    /// Create a fresh default configuration.
    fn create_default_config(&self) -> Box<dyn ExporterConfig>;

    fn create_trace_exporter(
        &self,
        ctx: &Context,
        params: ExporterCreateParams,
        cfg: &dyn ExporterConfig,
    ) -> Result<Box<dyn TraceExporter>>;

    fn create_metrics_exporter(
        &self,
        ctx: &Context,
        params: ExporterCreateParams,
        cfg: &dyn ExporterConfig,
    ) -> Result<Box<dyn MetricsExporter>>;

    /// Logs are opt-in: factories that do not override this report
    /// [`Error::DataTypeNotSupported`].
    fn create_logs_exporter(
        &self,
        _ctx: &Context,
        _params: ExporterCreateParams,
        _cfg: &dyn ExporterConfig,
    ) -> Result<Box<dyn LogsExporter>> {
        Err(Error::not_supported(DataType::Logs))
    }
}
