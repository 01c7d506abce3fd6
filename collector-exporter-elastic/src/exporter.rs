//! Trace exporter built by the Elastic factory.

use collector_common::config::{ComponentType, ExporterConfig};
use collector_common::context::{Context, ExporterCreateParams};
use collector_common::pdata::Traces;
use collector_common::{Component, Error, Result, TraceExporter};
use parking_lot::RwLock;
use tracing::{debug, info, trace};

use crate::config::{Config, TlsClientSettings};
use crate::error::ElasticError;

/// Lifecycle state of an exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExporterState {
    Created,
    Running,
    Shutdown,
}

/// Statistics for the exporter.
#[derive(Debug, Clone, Default)]
pub struct ExporterStats {
    pub batches_received: u64,
    pub spans_received: u64,
    pub transactions_received: u64,
    pub rejected_batches: u64,
}

/// Credentials presented to the APM server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    None,
    ApiKey(String),
    SecretToken(String),
}

impl Authorization {
    /// API key wins over secret token when both are configured.
    fn from_config(config: &Config) -> Self {
        if !config.api_key.is_empty() {
            Authorization::ApiKey(config.api_key.clone())
        } else if !config.secret_token.is_empty() {
            Authorization::SecretToken(config.secret_token.clone())
        } else {
            Authorization::None
        }
    }

    /// Value of the `Authorization` header, if any.
    pub fn header_value(&self) -> Option<String> {
        match self {
            Authorization::None => None,
            Authorization::ApiKey(key) => Some(format!("ApiKey {}", key)),
            Authorization::SecretToken(token) => Some(format!("Bearer {}", token)),
        }
    }
}

/// Exporter accepting trace batches for an Elastic APM server.
pub struct ElasticTraceExporter {
    component_type: ComponentType,
    name: String,
    server_url: String,
    authorization: Authorization,
    tls: TlsClientSettings,
    span: tracing::Span,
    state: RwLock<ExporterState>,
    stats: RwLock<ExporterStats>,
}

impl ElasticTraceExporter {
    /// Create an exporter from a validated configuration.
    ///
    /// TLS files named in the configuration must be readable.
    pub fn new(
        config: &Config,
        params: ExporterCreateParams,
    ) -> std::result::Result<Self, ElasticError> {
        config.check()?;

        for path in config.tls.files() {
            std::fs::metadata(path).map_err(|source| ElasticError::TlsFile {
                path: path.clone(),
                source,
            })?;
        }

        let exporter = Self {
            component_type: config.settings.type_val.clone(),
            name: config.settings.name_val.clone(),
            server_url: config.server_url().to_string(),
            authorization: Authorization::from_config(config),
            tls: config.tls.clone(),
            span: params.span,
            state: RwLock::new(ExporterState::Created),
            stats: RwLock::new(ExporterStats::default()),
        };

        exporter.span.in_scope(|| {
            info!(
                exporter = %exporter.name,
                server_url = %exporter.server_url,
                authenticated = (exporter.authorization != Authorization::None),
                "Elastic trace exporter created"
            );
        });

        Ok(exporter)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    pub fn tls(&self) -> &TlsClientSettings {
        &self.tls
    }

    pub fn state(&self) -> ExporterState {
        *self.state.read()
    }

    /// Get current statistics.
    pub fn stats(&self) -> ExporterStats {
        self.stats.read().clone()
    }
}

impl Component for ElasticTraceExporter {
    fn component_type(&self) -> &ComponentType {
        &self.component_type
    }

    fn start(&self, ctx: &Context) -> Result<()> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let mut state = self.state.write();
        match *state {
            ExporterState::Created => {
                *state = ExporterState::Running;
                self.span
                    .in_scope(|| info!(exporter = %self.name, "Elastic trace exporter started"));
                Ok(())
            }
            ExporterState::Running => Ok(()),
            ExporterState::Shutdown => Err(Error::component(ElasticError::AlreadyShutdown)),
        }
    }

    fn shutdown(&self, _ctx: &Context) -> Result<()> {
        let mut state = self.state.write();
        if *state == ExporterState::Shutdown {
            return Ok(());
        }
        *state = ExporterState::Shutdown;

        let stats = self.stats();
        self.span.in_scope(|| {
            info!(
                exporter = %self.name,
                batches_received = stats.batches_received,
                spans_received = stats.spans_received,
                rejected_batches = stats.rejected_batches,
                "Elastic trace exporter shut down"
            );
        });
        Ok(())
    }
}

impl TraceExporter for ElasticTraceExporter {
    fn consume_traces(&self, ctx: &Context, traces: Traces) -> Result<()> {
        if let Some(err) = ctx.err() {
            self.stats.write().rejected_batches += 1;
            return Err(err);
        }

        // Root spans become APM transactions, the rest APM spans.
        let transactions = traces.spans.iter().filter(|s| s.is_root()).count() as u64;
        let spans = traces.span_count() as u64;

        {
            // Held until the batch is counted so shutdown sees final stats.
            let state = self.state.read();
            if *state != ExporterState::Running {
                self.stats.write().rejected_batches += 1;
                return Err(Error::component(ElasticError::NotRunning));
            }

            let mut stats = self.stats.write();
            stats.batches_received += 1;
            stats.spans_received += spans;
            stats.transactions_received += transactions;
        }

        self.span.in_scope(|| {
            debug!(spans, transactions, "Received trace batch");
            for span in &traces.spans {
                trace!(
                    span_name = %span.name,
                    kind = ?span.kind,
                    duration_nanos = span.duration_nanos(),
                    "Span"
                );
            }
        });

        Ok(())
    }
}

/// Build the trace exporter for an Elastic configuration.
///
/// Fails with the context's error if it is already done, with
/// [`Error::Config`] if `cfg` is not an Elastic [`Config`], and with a
/// wrapped [`ElasticError`] if the configuration cannot be used.
pub fn new_elastic_trace_exporter(
    ctx: &Context,
    params: ExporterCreateParams,
    cfg: &dyn ExporterConfig,
) -> Result<Box<dyn TraceExporter>> {
    if let Some(err) = ctx.err() {
        return Err(err);
    }

    let config = cfg.as_any().downcast_ref::<Config>().ok_or_else(|| {
        Error::config(format!(
            "Exporter '{}' of type '{}' is not an Elastic configuration",
            cfg.name(),
            cfg.component_type()
        ))
    })?;

    let exporter = ElasticTraceExporter::new(config, params).map_err(Error::component)?;
    Ok(Box::new(exporter))
}
