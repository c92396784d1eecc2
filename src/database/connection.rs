//! Database connection management

use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::settings;
use crate::utils::errors::UserEventsError;

pub type DatabasePool = Pool<Postgres>;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
    /// Extra attempts made when the server cannot be reached.
    pub connect_retries: u32,
    pub retry_delay: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/user_events".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
            connect_retries: 6,
            retry_delay: Duration::from_secs(5),
        }
    }
}

impl From<&settings::DatabaseConfig> for DatabaseConfig {
    fn from(config: &settings::DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_retries: config.connect_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            ..Self::default()
        }
    }
}

/// Create a new database connection pool
///
/// Transient failures (server unreachable, pool timeout) are retried up to
/// `connect_retries` times; anything else fails immediately.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, UserEventsError> {
    let mut attempt = 0;
    loop {
        match try_create_pool(config).await {
            Ok(pool) => {
                info!("Database connection pool created successfully");
                return Ok(pool);
            }
            Err(e) if attempt < config.connect_retries && is_transient(&e) => {
                attempt += 1;
                warn!(
                    attempt = attempt,
                    max_retries = config.connect_retries,
                    error = %e,
                    "Database connection failed, retrying"
                );
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

async fn try_create_pool(config: &DatabaseConfig) -> Result<DatabasePool, sqlx::Error> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}

/// Whether a failure is worth another connection attempt.
pub fn is_transient(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_)
    )
}

/// Run database migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), UserEventsError> {
    info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    info!("Database migrations completed successfully");
    Ok(())
}
