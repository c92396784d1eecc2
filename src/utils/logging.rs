//! Logging configuration and setup
//!
//! This module provides logging initialization for the UserEvents
//! application: stdout (plain or JSON), an optional daily rolling file and the
//! optional live console layer.

use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::hubs::{ConsoleHub, ConsoleLayer};
use crate::utils::errors::{Result, UserEventsError};

const LOG_FILE_PREFIX: &str = "user_events.log";

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer when dropped and must be kept
/// alive for as long as the application runs.
pub fn init_logging(
    config: &LoggingConfig,
    console: Option<ConsoleLayer<ConsoleHub>>,
) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match config.file_path.as_deref() {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(non_blocking)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    let json_layer = config.json.then(|| fmt::layer().json().with_writer(std::io::stdout));
    let plain_layer = (!config.json).then(|| fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.level))
        .with(json_layer)
        .with(plain_layer)
        .with(file_layer)
        .with(console)
        .try_init()
        .map_err(|e| UserEventsError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Parses a configured level name, falling back to `INFO`.
pub fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}
