//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::utils::errors::UserEventsError;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub email: Option<EmailConfig>,
    pub health: HealthConfig,
    pub logging: LoggingConfig,
    pub console: ConsoleConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub bind_address: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_retries: u32,
    pub retry_delay_ms: u64,
}

/// SMTP settings for the contact form; the endpoint is disabled without them
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub admin_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthConfig {
    pub cache_ttl_seconds: u64,
    pub response_max_age_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for daily rolling log files
    pub file_path: Option<String>,
    pub json: bool,
}

/// Live log streaming over `/consoleHub`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub buffer_size: usize,
    pub level: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("USEREVENTS").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Load settings from an explicit file, still honoring the environment
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("USEREVENTS").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("server.bind_address", defaults.server.bind_address)?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", defaults.database.max_connections)?
            .set_default("database.min_connections", defaults.database.min_connections)?
            .set_default("database.connect_retries", defaults.database.connect_retries)?
            .set_default("database.retry_delay_ms", defaults.database.retry_delay_ms)?
            .set_default("health.cache_ttl_seconds", defaults.health.cache_ttl_seconds)?
            .set_default(
                "health.response_max_age_seconds",
                defaults.health.response_max_age_seconds,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.json", defaults.logging.json)?
            .set_default("console.enabled", defaults.console.enabled)?
            .set_default("console.buffer_size", defaults.console.buffer_size as u64)?
            .set_default("console.level", defaults.console.level)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), UserEventsError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/user_events".to_string(),
                max_connections: 10,
                min_connections: 1,
                connect_retries: 6,
                retry_delay_ms: 5000,
            },
            email: None,
            health: HealthConfig {
                cache_ttl_seconds: 55 * 60,
                response_max_age_seconds: 1800,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
                json: false,
            },
            console: ConsoleConfig {
                enabled: true,
                buffer_size: 256,
                level: "info".to_string(),
            },
        }
    }
}
