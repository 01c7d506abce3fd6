//! Errors raised by the Elastic exporter.

use std::path::PathBuf;

use thiserror::Error;

/// Errors specific to the Elastic exporter.
///
/// They reach the host wrapped in `collector_common::Error::Component` and
/// can be recovered with `Error::downcast_ref::<ElasticError>()`.
#[derive(Debug, Error)]
pub enum ElasticError {
    #[error("Invalid APM server URL '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("TLS client certificate and key must be set together")]
    IncompleteKeyPair,

    #[error("Cannot read TLS file '{}': {source}", path.display())]
    TlsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Exporter is not running")]
    NotRunning,

    #[error("Exporter has been shut down")]
    AlreadyShutdown,
}
