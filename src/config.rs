//! Configuration for the storefront.
//!
//! Supports a TOML file and environment variable overrides.

use crate::order_number::OverflowPolicy;
use crate::tracking::AccessPolicy;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_PATH_VAR: &str = "UTHRAA_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "uthraa.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub order_numbers: OrderNumberConfig,
    pub tracking: TrackingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Request queue capacity of each collection actor.
    pub buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderNumberConfig {
    /// What happens after `ORD99999`.
    pub overflow: OverflowPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Address the JSON-lines gateway binds to.
    pub listen: String,
    /// Updates buffered per connection before new ones are dropped.
    pub outbox_capacity: usize,
    pub access: AccessPolicy,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:7400".to_string(),
            outbox_capacity: 16,
            access: AccessPolicy::Open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: "info".to_string() }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (`$UTHRAA_CONFIG`, default `uthraa.toml`, may be absent)
    /// 3. Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            Self::from_file(&config_path)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Applies `UTHRAA_*` overrides read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(listen) = lookup("UTHRAA_TRACKING_LISTEN") {
            self.tracking.listen = listen;
        }
        if let Some(filter) = lookup("UTHRAA_LOG") {
            self.logging.filter = filter;
        }
        if let Some(value) = lookup("UTHRAA_ORDER_NUMBER_OVERFLOW") {
            self.order_numbers.overflow = parse_choice("UTHRAA_ORDER_NUMBER_OVERFLOW", &value)?;
        }
        if let Some(value) = lookup("UTHRAA_TRACKING_ACCESS") {
            self.tracking.access = parse_choice("UTHRAA_TRACKING_ACCESS", &value)?;
        }
        Ok(())
    }
}

/// Reads an enum override using the same spelling the file uses.
fn parse_choice<T: DeserializeOwned>(key: &str, value: &str) -> Result<T, ConfigError> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| ConfigError::InvalidOverride(key.to_string(), value.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid value for {0}: {1:?}")]
    InvalidOverride(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.buffer_size, 32);
        assert_eq!(config.order_numbers.overflow, OverflowPolicy::Reject);
        assert_eq!(config.tracking.listen, "127.0.0.1:7400");
        assert_eq!(config.tracking.access, AccessPolicy::Open);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_parse_toml() {
        let config = Config::from_toml(
            r#"
[order_numbers]
overflow = "widen"

[tracking]
listen = "0.0.0.0:9000"
access = "owner-or-admin"
"#,
        )
        .unwrap();
        assert_eq!(config.order_numbers.overflow, OverflowPolicy::Widen);
        assert_eq!(config.tracking.listen, "0.0.0.0:9000");
        assert_eq!(config.tracking.access, AccessPolicy::OwnerOrAdmin);
        assert_eq!(config.tracking.outbox_capacity, 16);
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn test_unknown_policy_in_file_is_an_error() {
        let err = Config::from_toml("[order_numbers]\noverflow = \"wrap\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("UTHRAA_TRACKING_LISTEN", "127.0.0.1:0"),
            ("UTHRAA_ORDER_NUMBER_OVERFLOW", "widen"),
            ("UTHRAA_TRACKING_ACCESS", "owner-or-admin"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.tracking.listen, "127.0.0.1:0");
        assert_eq!(config.order_numbers.overflow, OverflowPolicy::Widen);
        assert_eq!(config.tracking.access, AccessPolicy::OwnerOrAdmin);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_bad_override_is_reported() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|key| (key == "UTHRAA_TRACKING_ACCESS").then(|| "everyone".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOverride(key, _) if key == "UTHRAA_TRACKING_ACCESS"));
    }
}
