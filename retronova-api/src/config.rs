//! Configuration management for the Retronova API

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use validator::Validate;

/// Environment variable overriding `database.url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate]
    pub database: DatabaseConfig,
    #[validate]
    pub api: ApiConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Usually supplied through `DATABASE_URL`
    pub url: String,
    #[validate(range(min = 1, max = 100))]
    pub max_connections: u32,
    #[validate(range(max = 50))]
    pub min_connections: u32,
    #[validate(range(min = 1, max = 300))]
    pub acquire_timeout_secs: u64,
    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: String,
    /// Origins allowed to make credentialed cross-origin requests
    pub cors_origins: Vec<String>,
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1024, max = 104857600))]
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    /// JSON log lines instead of human-readable output
    pub structured_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_secs: 30,
            run_migrations: true,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            cors_origins: vec![
                "http://localhost".to_string(),
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            request_timeout_secs: 30,
            max_request_size_bytes: 2 * 1024 * 1024,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Override `database.url` with `DATABASE_URL` when it is set
    pub fn apply_env(&mut self) {
        self.override_database_url(std::env::var(DATABASE_URL_ENV).ok());
    }

    pub fn override_database_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            self.database.url = url;
        }
    }

    /// Field ranges plus the checks that span several fields.
    ///
    /// The database URL is only required when PostgreSQL is the backend.
    pub fn validate_all(&self, require_database: bool) -> Result<()> {
        Validate::validate(self).context("Invalid configuration")?;

        if self.database.min_connections > self.database.max_connections {
            bail!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        self.bind_addr()?;

        if self.api.cors_origins.iter().any(|origin| origin.trim().is_empty()) {
            bail!("api.cors_origins cannot contain empty entries");
        }

        if require_database && self.database.url.trim().is_empty() {
            bail!("{} is not set", DATABASE_URL_ENV);
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.api
            .bind_address
            .parse()
            .with_context(|| format!("Invalid api.bind_address: {}", self.api.bind_address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid_without_database() {
        let config = AppConfig::default();
        assert!(config.validate_all(false).is_ok());
        assert_eq!(config.api.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn test_missing_database_url() {
        let err = AppConfig::default().validate_all(true).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL is not set"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let mut config = AppConfig::default();
        config.override_database_url(Some("postgresql://a:b@db:5432/c".to_string()));
        config.override_database_url(Some("  ".to_string()));
        config.override_database_url(None);
        assert_eq!(config.database.url, "postgresql://a:b@db:5432/c");
    }
}
