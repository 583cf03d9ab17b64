//! Configuration management for the upload registry server
//!
//! Settings come from an optional `config.toml` with environment overrides
//! (`UPLOAD_REGISTRY_*`), on top of built-in defaults.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::storage::default_registry_path;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 881;

/// Server configuration (restart required for any change)
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    /// Environment: UPLOAD_REGISTRY_BIND_ADDRESS
    pub bind_address: String,

    /// Port for the HTTP listener
    /// Environment: UPLOAD_REGISTRY_PORT
    pub port: u16,

    /// Path of the registry file; empty means the system temp directory
    /// Environment: UPLOAD_REGISTRY_REGISTRY_FILE
    #[serde(default)]
    pub registry_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            registry_file: String::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Packaged layout first, then the working directory
        let config_paths = ["upload-registry/config", "config"];

        let mut builder = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("registry_file", "")?;

        for config_path in config_paths {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("UPLOAD_REGISTRY").prefix_separator("_"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get the registry file path, falling back to the temp directory
    pub fn registry_path(&self) -> PathBuf {
        if self.registry_file.trim().is_empty() {
            default_registry_path()
        } else {
            PathBuf::from(&self.registry_file)
        }
    }
}
