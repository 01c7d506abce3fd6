//! Factory registering the Elastic exporter with the host.

use collector_common::config::{ComponentType, ExporterConfig, ExporterSettings};
use collector_common::context::{Context, ExporterCreateParams};
use collector_common::{DataType, Error, ExporterFactory, MetricsExporter, Result, TraceExporter};

use crate::config::Config;
use crate::exporter::new_elastic_trace_exporter;

/// The value of the "type" key in configuration.
pub const TYPE_STR: &str = "elastic";

/// Component type of the Elastic exporter.
pub const TYPE: ComponentType = ComponentType::from_static(TYPE_STR);

/// Factory for the Elastic exporter.
///
/// Only traces are supported. Metrics cannot be converted to the APM intake
/// model yet, so [`ExporterFactory::create_metrics_exporter`] always returns
/// [`Error::DataTypeNotSupported`]. Logs fall back to the same error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElasticExporterFactory;

impl ElasticExporterFactory {
    pub fn new() -> Self {
        Self
    }
}

impl ExporterFactory for ElasticExporterFactory {
    fn component_type(&self) -> ComponentType {
        TYPE
    }

    fn create_default_config(&self) -> Box<dyn ExporterConfig> {
        Box::new(Config::new(ExporterSettings::new(TYPE)))
    }

    fn create_trace_exporter(
        &self,
        ctx: &Context,
        params: ExporterCreateParams,
        cfg: &dyn ExporterConfig,
    ) -> Result<Box<dyn TraceExporter>> {
        new_elastic_trace_exporter(ctx, params, cfg)
    }

    fn create_metrics_exporter(
        &self,
        _ctx: &Context,
        _params: ExporterCreateParams,
        _cfg: &dyn ExporterConfig,
    ) -> Result<Box<dyn MetricsExporter>> {
        Err(Error::not_supported(DataType::Metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collector_common::Component;

    #[test]
    fn test_component_type() {
        let factory = ElasticExporterFactory::new();
        assert_eq!(factory.component_type(), "elastic");
        assert_eq!(factory.component_type(), factory.component_type());
    }

    #[test]
    fn test_create_default_config() {
        let factory = ElasticExporterFactory::new();
        let cfg = factory.create_default_config();

        assert_eq!(cfg.component_type(), &TYPE);
        assert_eq!(cfg.name(), TYPE_STR);

        let config = cfg.as_any().downcast_ref::<Config>().unwrap();
        assert!(config.apm_server_url.is_empty());
        assert!(config.api_key.is_empty());
        assert!(config.secret_token.is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_create_trace_exporter() {
        let factory = ElasticExporterFactory::new();
        let cfg = factory.create_default_config();

        let exporter = factory
            .create_trace_exporter(
                &Context::background(),
                ExporterCreateParams::default(),
                cfg.as_ref(),
            )
            .unwrap();
        assert_eq!(exporter.component_type(), "elastic");
    }

    #[test]
    fn test_create_metrics_exporter_not_supported() {
        let factory = ElasticExporterFactory::new();
        let cfg = factory.create_default_config();

        let result = factory.create_metrics_exporter(
            &Context::background(),
            ExporterCreateParams::default(),
            cfg.as_ref(),
        );
        assert!(matches!(
            result,
            Err(Error::DataTypeNotSupported {
                data_type: DataType::Metrics
            })
        ));
    }

    #[test]
    fn test_create_logs_exporter_not_supported() {
        let factory = ElasticExporterFactory::new();
        let cfg = factory.create_default_config();

        let result = factory.create_logs_exporter(
            &Context::background(),
            ExporterCreateParams::default(),
            cfg.as_ref(),
        );
        assert!(matches!(
            result,
            Err(Error::DataTypeNotSupported {
                data_type: DataType::Logs
            })
        ));
    }
}
