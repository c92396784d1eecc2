//! Database health check with a short-lived result cache

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::database::DatabasePool;
use crate::services::service::cancellable;
use crate::utils::errors::Result;

const HEALTH_CHECK_KEY: &str = "healthCheck";

/// Anything that can answer "is the backing store reachable".
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self, token: &CancellationToken) -> Result<i32>;
}

/// Runs `SELECT 1` against the pool.
pub struct DatabaseProbe {
    pool: DatabasePool,
}

impl DatabaseProbe {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for DatabaseProbe {
    async fn probe(&self, token: &CancellationToken) -> Result<i32> {
        cancellable(token, sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool)).await
    }
}

#[derive(Clone)]
pub struct HealthService {
    probe: Arc<dyn HealthProbe>,
    cache: Cache<&'static str, i32>,
}

impl HealthService {
    pub fn new(probe: Arc<dyn HealthProbe>, ttl: Duration) -> Self {
        Self {
            probe,
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Probe result, served from cache while it is fresh.
    pub async fn check(&self, token: &CancellationToken) -> Result<i32> {
        if let Some(cached) = self.cache.get(HEALTH_CHECK_KEY).await {
            debug!("Serving cached health check result");
            return Ok(cached);
        }

        let result = self.probe.probe(token).await.map_err(|e| {
            error!(error = %e, "Health check failed");
            e
        })?;
        self.cache.insert(HEALTH_CHECK_KEY, result).await;
        Ok(result)
    }
}
