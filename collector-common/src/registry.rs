//! Host-side registry routing exporter configuration to factories.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::component::{Component, ExporterFactory, LogsExporter, MetricsExporter, TraceExporter};
use crate::config::{ComponentType, ExporterConfig};
use crate::context::{Context, ExporterCreateParams};
use crate::error::{Error, Result};
use crate::signal::DataType;

/// Exporter built for one signal kind.
pub enum BuiltExporter {
    Traces(Box<dyn TraceExporter>),
    Metrics(Box<dyn MetricsExporter>),
    Logs(Box<dyn LogsExporter>),
}

impl BuiltExporter {
    pub fn data_type(&self) -> DataType {
        match self {
            BuiltExporter::Traces(_) => DataType::Traces,
            BuiltExporter::Metrics(_) => DataType::Metrics,
            BuiltExporter::Logs(_) => DataType::Logs,
        }
    }

    pub fn component_type(&self) -> &ComponentType {
        match self {
            BuiltExporter::Traces(e) => e.component_type(),
            BuiltExporter::Metrics(e) => e.component_type(),
            BuiltExporter::Logs(e) => e.component_type(),
        }
    }

    pub fn start(&self, ctx: &Context) -> Result<()> {
        match self {
            BuiltExporter::Traces(e) => e.start(ctx),
            BuiltExporter::Metrics(e) => e.start(ctx),
            BuiltExporter::Logs(e) => e.start(ctx),
        }
    }

    pub fn shutdown(&self, ctx: &Context) -> Result<()> {
        match self {
            BuiltExporter::Traces(e) => e.shutdown(ctx),
            BuiltExporter::Metrics(e) => e.shutdown(ctx),
            BuiltExporter::Logs(e) => e.shutdown(ctx),
        }
    }
}

impl std::fmt::Debug for BuiltExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltExporter")
            .field("data_type", &self.data_type())
            .field("component_type", self.component_type())
            .finish()
    }
}

/// Outcome of building an exporter for several signal kinds.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub exporters: Vec<BuiltExporter>,
    /// Signal kinds the exporter type does not support.
    pub skipped: Vec<DataType>,
}

/// Registry of exporter factories keyed by component type.
#[derive(Default)]
pub struct ExporterRegistry {
    factories: HashMap<ComponentType, Arc<dyn ExporterFactory>>,
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its component type.
    pub fn register(&mut self, factory: Arc<dyn ExporterFactory>) -> Result<()> {
        let component_type = factory.component_type();
        if self.factories.contains_key(&component_type) {
            return Err(Error::DuplicateType(component_type.to_string()));
        }
        debug!(component_type = %component_type, "Registered exporter factory");
        self.factories.insert(component_type, factory);
        Ok(())
    }

    pub fn factory(&self, component_type: &str) -> Option<&Arc<dyn ExporterFactory>> {
        self.factories.get(component_type)
    }

    /// Registered component types, sorted.
    pub fn types(&self) -> Vec<ComponentType> {
        let mut types: Vec<_> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }

    /// Build the configuration for the exporter with the given id.
    ///
    /// The id is either `type` or `type/name`. The factory default is taken,
    /// named after the full id, overlaid with `overrides` (skipped when
    /// `null`) and validated.
    pub fn load_config(&self, id: &str, overrides: &Value) -> Result<Box<dyn ExporterConfig>> {
        let type_str = parse_id(id)?;
        let factory = self
            .factory(type_str)
            .ok_or_else(|| Error::UnknownType(type_str.to_string()))?;

        let mut cfg = factory.create_default_config();
        if !overrides.is_null() {
            cfg.apply_overrides(overrides)?;
        }
        if cfg.component_type() != &factory.component_type() {
            return Err(Error::config(format!(
                "Exporter '{}' cannot change its type to '{}'",
                id,
                cfg.component_type()
            )));
        }
        cfg.settings_mut().name_val = id.to_string();
        cfg.validate()?;

        debug!(exporter = id, "Loaded exporter configuration");
        Ok(cfg)
    }

    /// Build the exporter for a single signal kind.
    ///
    /// Every factory error, including [`Error::DataTypeNotSupported`], is
    /// returned as is.
    pub fn build(
        &self,
        ctx: &Context,
        params: ExporterCreateParams,
        cfg: &dyn ExporterConfig,
        data_type: DataType,
    ) -> Result<BuiltExporter> {
        let component_type = cfg.component_type();
        let factory = self
            .factory(component_type.as_str())
            .ok_or_else(|| Error::UnknownType(component_type.to_string()))?;

        let built = match data_type {
            DataType::Traces => factory
                .create_trace_exporter(ctx, params, cfg)
                .map(BuiltExporter::Traces)?,
            DataType::Metrics => factory
                .create_metrics_exporter(ctx, params, cfg)
                .map(BuiltExporter::Metrics)?,
            DataType::Logs => factory
                .create_logs_exporter(ctx, params, cfg)
                .map(BuiltExporter::Logs)?,
        };

        info!(exporter = cfg.name(), data_type = %data_type, "Exporter created");
        Ok(built)
    }

    /// Build the exporter for each signal kind it supports.
    ///
    /// Unsupported signal kinds are logged and skipped. Any other error
    /// aborts the whole build.
    pub fn build_available(
        &self,
        ctx: &Context,
        params: &ExporterCreateParams,
        cfg: &dyn ExporterConfig,
        data_types: &[DataType],
    ) -> Result<BuildReport> {
        let mut report = BuildReport::default();

        for &data_type in data_types {
            match self.build(ctx, params.clone(), cfg, data_type) {
                Ok(exporter) => report.exporters.push(exporter),
                Err(e) if e.is_data_type_not_supported() => {
                    warn!(
                        exporter = cfg.name(),
                        data_type = %data_type,
                        "Exporter does not support signal kind, skipping"
                    );
                    report.skipped.push(data_type);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(report)
    }
}

impl std::fmt::Debug for ExporterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExporterRegistry")
            .field("types", &self.types())
            .finish()
    }
}

/// Extract the component type from a `type[/name]` id.
fn parse_id(id: &str) -> Result<&str> {
    let invalid = |reason: &str| Error::InvalidId {
        id: id.to_string(),
        reason: reason.to_string(),
    };

    match id.split_once('/') {
        Some(("", _)) => Err(invalid("type part must not be empty")),
        Some((_, "")) => Err(invalid("name part must not be empty")),
        Some((type_str, _)) => Ok(type_str),
        None if id.is_empty() => Err(invalid("id must not be empty")),
        None => Ok(id),
    }
}
