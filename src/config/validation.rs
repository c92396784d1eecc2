//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use std::net::SocketAddr;

use tracing::Level;

use super::settings::{
    ConsoleConfig, DatabaseConfig, EmailConfig, HealthConfig, LoggingConfig, ServerConfig,
};
use super::Settings;
use crate::utils::errors::{Result, UserEventsError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_health_config(&settings.health)?;
    validate_logging_config(&settings.logging)?;
    validate_console_config(&settings.console)?;

    if let Some(ref email_config) = settings.email {
        validate_email_config(email_config)?;
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<()> {
    config.bind_address.parse::<SocketAddr>().map_err(|_| {
        UserEventsError::Config(format!("Invalid bind address: {}", config.bind_address))
    })?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(UserEventsError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(UserEventsError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(UserEventsError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

fn validate_email_config(config: &EmailConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(UserEventsError::Config(
            "SMTP host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(UserEventsError::Config(
            "SMTP port must be greater than 0".to_string()
        ));
    }

    if !config.admin_email.contains('@') {
        return Err(UserEventsError::Config(
            "Admin email must be a valid address".to_string()
        ));
    }

    Ok(())
}

fn validate_health_config(config: &HealthConfig) -> Result<()> {
    if config.cache_ttl_seconds == 0 {
        return Err(UserEventsError::Config(
            "Health cache TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    validate_level("Log", &config.level)
}

fn validate_console_config(config: &ConsoleConfig) -> Result<()> {
    if config.enabled && config.buffer_size == 0 {
        return Err(UserEventsError::Config(
            "Console buffer size must be greater than 0".to_string()
        ));
    }

    validate_level("Console", &config.level)
}

fn validate_level(name: &str, level: &str) -> Result<()> {
    level.parse::<Level>().map_err(|_| {
        UserEventsError::Config(format!(
            "{} level must be one of: trace, debug, info, warn, error",
            name
        ))
    })?;

    Ok(())
}
