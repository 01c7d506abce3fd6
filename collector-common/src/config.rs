use std::any::Any;
use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Identifier naming a component kind in the host registry.
///
/// Factories declare theirs with [`ComponentType::from_static`] so it is
/// available before any configuration is read.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentType(Cow<'static, str>);

impl ComponentType {
    /// Create a component type from a static string.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ComponentType {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<String> for ComponentType {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl PartialEq<str> for ComponentType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ComponentType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings every exporter configuration carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExporterSettings {
    /// Component type this configuration belongs to.
    #[serde(rename = "type")]
    pub type_val: ComponentType,

    /// Instance name, unique among exporters of the same type.
    #[serde(rename = "name")]
    pub name_val: String,
}

impl ExporterSettings {
    /// Create settings whose instance name equals the type.
    pub fn new(type_val: ComponentType) -> Self {
        let name_val = type_val.as_str().to_string();
        Self { type_val, name_val }
    }
}

/// Configuration object produced by an exporter factory.
///
/// The host owns it once created. Factories and exporters only read it and
/// recover their concrete type through [`ExporterConfig::as_any`].
pub trait ExporterConfig: Any + std::fmt::Debug + Send + Sync {
    /// Get the common exporter settings.
    fn settings(&self) -> &ExporterSettings;

    /// Get the common exporter settings mutably.
    fn settings_mut(&mut self) -> &mut ExporterSettings;

    /// Overlay user-supplied values onto this configuration.
    fn apply_overrides(&mut self, overrides: &Value) -> Result<()>;

    /// Validate the configuration.
    ///
    /// Called by the host after overrides have been applied.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;

    fn clone_box(&self) -> Box<dyn ExporterConfig>;

    /// Get the component type.
    fn component_type(&self) -> &ComponentType {
        &self.settings().type_val
    }

    /// Get the instance name.
    fn name(&self) -> &str {
        &self.settings().name_val
    }
}

impl Clone for Box<dyn ExporterConfig> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Merge a JSON object of overrides over `base` and deserialize the result.
///
/// Keys absent from `overrides` keep the value they have in `base`. Nested
/// objects are merged key by key; any other value replaces the old one.
/// A key `base` does not serialize is rejected, so a misspelled setting
/// fails instead of loading as the default.
pub fn overlay<T>(base: &T, overrides: &Value) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    if !overrides.is_object() {
        return Err(Error::config(format!(
            "Configuration overrides must be an object, got {}",
            overrides
        )));
    }

    let mut merged = serde_json::to_value(base)?;
    merge_values(&mut merged, overrides, "")?;
    Ok(serde_json::from_value(merged)?)
}

fn merge_values(target: &mut Value, overrides: &Value, path: &str) -> Result<()> {
    match (target, overrides) {
        (Value::Object(target), Value::Object(overrides)) => {
            for (key, value) in overrides {
                let key_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                match target.get_mut(key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_values(existing, value, &key_path)?;
                    }
                    Some(existing) => *existing = value.clone(),
                    None => {
                        return Err(Error::config(format!(
                            "unknown configuration key '{}'",
                            key_path
                        )));
                    }
                }
            }
        }
        (target, overrides) => *target = overrides.clone(),
    }
    Ok(())
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format (default).
    #[default]
    Text,
    /// Structured JSON format.
    Json,
}

/// Common logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format: "text" or "json".
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(flatten)]
        settings: ExporterSettings,
        #[serde(default)]
        endpoint: String,
        #[serde(default)]
        nested: Nested,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Nested {
        #[serde(default)]
        a: String,
        #[serde(default)]
        b: bool,
    }

    fn sample() -> Sample {
        Sample {
            settings: ExporterSettings::new(ComponentType::from_static("sample")),
            endpoint: String::new(),
            nested: Nested::default(),
        }
    }

    #[test]
    fn test_settings_name_defaults_to_type() {
        let settings = ExporterSettings::new(ComponentType::from_static("elastic"));
        assert_eq!(settings.type_val, "elastic");
        assert_eq!(settings.name_val, "elastic");
    }

    #[test]
    fn test_settings_serde_field_names() {
        let settings = ExporterSettings::new(ComponentType::from_static("elastic"));
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value, json!({ "type": "elastic", "name": "elastic" }));
    }

    #[test]
    fn test_overlay_keeps_unset_fields() {
        let merged = overlay(&sample(), &json!({ "endpoint": "http://localhost" })).unwrap();

        assert_eq!(merged.endpoint, "http://localhost");
        assert_eq!(merged.settings.name_val, "sample");
        assert_eq!(merged.nested, Nested::default());
    }

    #[test]
    fn test_overlay_merges_nested_objects() {
        let mut base = sample();
        base.nested.a = "kept".to_string();

        let merged = overlay(&base, &json!({ "nested": { "b": true } })).unwrap();

        assert_eq!(merged.nested.a, "kept");
        assert!(merged.nested.b);
    }

    #[test]
    fn test_overlay_rejects_unknown_key() {
        let result = overlay(&sample(), &json!({ "endpont": "http://localhost" }));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("'endpont'")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_overlay_rejects_unknown_nested_key() {
        let result = overlay(&sample(), &json!({ "nested": { "c": true } }));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("'nested.c'")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_overlay_rejects_non_object() {
        let result = overlay(&sample(), &json!(["endpoint"]));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_overlay_reports_type_mismatch() {
        let result = overlay(&sample(), &json!({ "nested": { "b": "yes" } }));
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_default_logging_config() {
        let config: LoggingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Text);
    }
}
