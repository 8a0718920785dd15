//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/electricity-business/config.toml`,
//! override with the `EVB_CONFIG` environment variable). Every section has
//! working defaults so the service can start without a file; the signing
//! secrets in particular must be overridden for any real deployment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::auth::token::TokenConfig;
use crate::infrastructure::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./electricity_business.db?mode=rwc".to_string(),
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        self.url.clone()
    }
}

/// Signing secrets and token lifetimes.
///
/// Access and refresh tokens are signed with independent secrets. The access
/// lifetime default is aggressive on purpose; tune it per deployment rather
/// than in code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            access_token_secret: "change-me-access-secret".to_string(),
            refresh_token_secret: "change-me-refresh-secret".to_string(),
            access_token_ttl_secs: 60,
            refresh_token_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl SecurityConfig {
    pub fn access_token_config(&self) -> TokenConfig {
        TokenConfig::new(self.access_token_secret.clone(), self.access_token_ttl_secs)
    }

    pub fn refresh_token_config(&self) -> TokenConfig {
        TokenConfig::new(self.refresh_token_secret.clone(), self.refresh_token_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.connection_url(),
        }
    }
}

/// Default config file location
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("electricity-business")
        .join("config.toml")
}
