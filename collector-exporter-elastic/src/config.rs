//! Configuration for the Elastic exporter.

use std::any::Any;
use std::path::PathBuf;

use collector_common::config::{ExporterConfig, ExporterSettings, overlay};
use collector_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ElasticError;

/// APM server used when `apm_server_url` is left empty.
pub const DEFAULT_APM_SERVER_URL: &str = "http://localhost:8200";

/// Elastic exporter configuration.
///
/// Everything beyond the common settings starts out empty so that host
/// overrides apply cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub settings: ExporterSettings,

    /// APM server URL (e.g., "https://apm.example.com:8200").
    #[serde(default)]
    pub apm_server_url: String,

    /// API key sent as `Authorization: ApiKey <key>`.
    #[serde(default)]
    pub api_key: String,

    /// Secret token sent as `Authorization: Bearer <token>`.
    #[serde(default)]
    pub secret_token: String,

    /// TLS settings for the APM server connection.
    #[serde(default)]
    pub tls: TlsClientSettings,
}

/// TLS client settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsClientSettings {
    /// CA certificate used to verify the server.
    #[serde(default)]
    pub ca_file: Option<PathBuf>,

    /// Client certificate, requires `key_file`.
    #[serde(default)]
    pub cert_file: Option<PathBuf>,

    /// Client private key, requires `cert_file`.
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Server name expected in the server certificate.
    #[serde(default)]
    pub server_name_override: String,
}

impl TlsClientSettings {
    /// Files referenced by these settings.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.ca_file, &self.cert_file, &self.key_file]
            .into_iter()
            .flatten()
    }
}

impl Config {
    pub fn new(settings: ExporterSettings) -> Self {
        Self {
            settings,
            apm_server_url: String::new(),
            api_key: String::new(),
            secret_token: String::new(),
            tls: TlsClientSettings::default(),
        }
    }

    /// APM server URL, falling back to [`DEFAULT_APM_SERVER_URL`].
    pub fn server_url(&self) -> &str {
        if self.apm_server_url.is_empty() {
            DEFAULT_APM_SERVER_URL
        } else {
            &self.apm_server_url
        }
    }

    /// Check the Elastic-specific settings.
    pub fn check(&self) -> std::result::Result<(), ElasticError> {
        if !self.apm_server_url.is_empty() {
            validate_url(&self.apm_server_url)?;
        }

        if self.tls.cert_file.is_some() != self.tls.key_file.is_some() {
            return Err(ElasticError::IncompleteKeyPair);
        }

        Ok(())
    }
}

fn validate_url(url: &str) -> std::result::Result<(), ElasticError> {
    let invalid = |reason: &str| ElasticError::InvalidServerUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .ok_or_else(|| invalid("scheme must be http or https"))?;

    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return Err(invalid("missing host"));
    }

    Ok(())
}

impl ExporterConfig for Config {
    fn settings(&self) -> &ExporterSettings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut ExporterSettings {
        &mut self.settings
    }

    fn apply_overrides(&mut self, overrides: &Value) -> Result<()> {
        *self = overlay(self, overrides)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.check().map_err(Error::component)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_box(&self) -> Box<dyn ExporterConfig> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collector_common::ComponentType;
    use serde_json::json;

    fn config() -> Config {
        Config::new(ExporterSettings::new(ComponentType::from_static("elastic")))
    }

    #[test]
    fn test_empty_url_uses_default_server() {
        let config = config();
        assert!(config.check().is_ok());
        assert_eq!(config.server_url(), DEFAULT_APM_SERVER_URL);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = config();
        config
            .apply_overrides(&json!({
                "apm_server_url": "https://apm.example.com:8200",
                "secret_token": "s3cr3t",
                "tls": { "insecure_skip_verify": true }
            }))
            .unwrap();

        assert_eq!(config.server_url(), "https://apm.example.com:8200");
        assert_eq!(config.secret_token, "s3cr3t");
        assert!(config.api_key.is_empty());
        assert!(config.tls.insecure_skip_verify);
        assert!(config.tls.ca_file.is_none());
        assert_eq!(config.settings.name_val, "elastic");
    }

    #[test]
    fn test_validate_url_scheme() {
        let mut config = config();
        config.apm_server_url = "ftp://apm.example.com".to_string();

        let err = config.check().unwrap_err();
        assert!(matches!(err, ElasticError::InvalidServerUrl { .. }));
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn test_validate_url_host() {
        let mut config = config();
        config.apm_server_url = "http:///intake".to_string();

        let err = config.check().unwrap_err();
        assert!(err.to_string().contains("missing host"));
    }

    #[test]
    fn test_validate_incomplete_key_pair() {
        let mut config = config();
        config.tls.cert_file = Some(PathBuf::from("/etc/ssl/client.pem"));

        assert!(matches!(
            config.check(),
            Err(ElasticError::IncompleteKeyPair)
        ));

        config.tls.key_file = Some(PathBuf::from("/etc/ssl/client.key"));
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_validate_wraps_elastic_error() {
        let mut config = config();
        config.apm_server_url = "apm.example.com".to_string();

        let err = ExporterConfig::validate(&config).unwrap_err();
        assert!(err.downcast_ref::<ElasticError>().is_some());
    }

    #[test]
    fn test_tls_files() {
        let tls = TlsClientSettings {
            ca_file: Some(PathBuf::from("ca.pem")),
            key_file: Some(PathBuf::from("client.key")),
            ..Default::default()
        };
        let files: Vec<_> = tls.files().collect();
        assert_eq!(files.len(), 2);
    }
}
