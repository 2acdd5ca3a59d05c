//! Configuration loading and management
//!
//! Every section has defaults, so an empty file (or no file at all) yields a
//! working in-memory development server.

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the YAML file to load
pub const CONFIG_ENV: &str = "KYC_CONFIG";

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KycConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub dashboard: DashboardConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,

    /// Allow any origin (browser front-ends served from elsewhere)
    pub cors_permissive: bool,

    /// Events a slow websocket client may fall behind before skipping
    pub event_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            cors_permissive: true,
            event_capacity: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Mongodb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub mongodb_uri: String,
    pub database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            database: "kyc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityBackend {
    Memory,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// When false, guarded routes run with an anonymous context
    pub required: bool,
    pub provider: IdentityBackend,
    pub remote_base_url: String,
    pub api_key: Option<String>,
    pub session_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            required: true,
            provider: IdentityBackend::Memory,
            remote_base_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            api_key: None,
            session_ttl_hours: 24,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of transactions in the "recent" card
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { recent_limit: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Offset of the staff's calendar from UTC (WIB by default)
    pub utc_offset_minutes: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 7 * 60,
        }
    }
}

impl KycConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from `KYC_CONFIG` (when set), then apply `KYC_*` overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_yaml_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment-style overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("KYC_BIND") {
            self.server.bind = bind;
        }
        if let Some(backend) = lookup("KYC_STORAGE_BACKEND") {
            self.storage.backend = parse_enum("KYC_STORAGE_BACKEND", &backend)?;
        }
        if let Some(uri) = lookup("KYC_MONGODB_URI") {
            self.storage.mongodb_uri = uri;
        }
        if let Some(database) = lookup("KYC_DATABASE") {
            self.storage.database = database;
        }
        if let Some(required) = lookup("KYC_AUTH_REQUIRED") {
            self.auth.required = parse_bool("KYC_AUTH_REQUIRED", &required)?;
        }
        if let Some(provider) = lookup("KYC_AUTH_PROVIDER") {
            self.auth.provider = parse_enum("KYC_AUTH_PROVIDER", &provider)?;
        }
        if let Some(api_key) = lookup("KYC_AUTH_API_KEY") {
            self.auth.api_key = Some(api_key).filter(|k| !k.is_empty());
        }
        Ok(())
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            message: "expected true or false".to_string(),
        }),
    }
}

fn parse_enum<T: serde::de::DeserializeOwned>(field: &str, value: &str) -> Result<T, ConfigError> {
    let normalized = value.trim().to_ascii_lowercase();
    serde_yaml::from_str(&normalized).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}
