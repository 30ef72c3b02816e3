// Configuration module for the Identity Registry Service
//
// Settings are read from an optional TOML file plus REGISTRY-prefixed
// environment variable overrides. Every field has a default so the
// service starts with no configuration at all (in-memory storage on
// localhost).

use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// API server configuration
    pub api: ApiConfig,
    /// Record store configuration
    pub storage: StorageConfig,
    /// OTP issuance configuration
    pub otp: OtpConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// IP address to bind the API server to
    pub bind_address: String,
    /// Port number for the API server
    pub port: u16,
    /// Whether to enable Cross-Origin Resource Sharing
    pub enable_cors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            enable_cors: false,
        }
    }
}

/// Record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage engine type ("memory" or "sqlite")
    pub engine: String,
    /// Path to the database file (for the sqlite engine)
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            engine: "memory".to_string(),
            database_path: "data/registry.db".to_string(),
        }
    }
}

/// OTP issuance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Validity window of a generated code, in seconds
    pub ttl_secs: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from `path` (if it exists) with environment
    /// overrides, e.g. `REGISTRY_API__PORT=8080`.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("REGISTRY").separator("__"))
            .build()?;

        Ok(config.try_deserialize::<NodeConfig>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_is_absent() {
        let config = NodeConfig::load(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.api.port, 3000);
        assert_eq!(config.storage.engine, "memory");
        assert_eq!(config.otp.ttl_secs, 300);
        assert_eq!(config.logging.level, "info");
    }
}
