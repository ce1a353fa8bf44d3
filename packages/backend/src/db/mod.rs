pub mod activity;
pub mod config;

mod health_monitor;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::db::config::{DbConfig, DbConfigError};
use crate::db::health_monitor::{HealthCheckResult, HealthTracker};

pub use crate::db::health_monitor::HealthCheckSnapshot;

/// Read-only handle on the Activity Store
pub struct DatabaseProxy {
    config: DbConfig,
    pool: PgPool,
    health: Arc<RwLock<HealthTracker>>,
}

impl DatabaseProxy {
    pub async fn from_env() -> Result<Arc<Self>, DbInitError> {
        let config = DbConfig::from_env()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_lazy(&config.primary_url)?;

        let proxy = Arc::new(Self {
            health: Arc::new(RwLock::new(HealthTracker::new(config.health_check.clone()))),
            config,
            pool,
        });

        proxy.start_health_monitor();

        tracing::info!(
            max_connections = proxy.config.max_connections,
            acquire_timeout_ms = proxy.config.acquire_timeout.as_millis() as u64,
            "activity store pool created"
        );

        Ok(proxy)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_status(&self) -> HealthCheckSnapshot {
        let tracker = self.health.read().await;
        tracker.snapshot()
    }
}

impl DatabaseProxy {
    fn start_health_monitor(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let interval = self.config.health_check.interval;

        tokio::spawn(async move {
            loop {
                let Some(proxy) = weak.upgrade() else {
                    break;
                };

                let start = tokio::time::Instant::now();
                let result = proxy.check_health().await;
                proxy.health.write().await.process(result);
                drop(proxy);

                let elapsed = start.elapsed();
                if elapsed < interval {
                    tokio::time::sleep(interval - elapsed).await;
                }
            }
        });
    }

    async fn check_health(&self) -> HealthCheckResult {
        let timeout = self.config.health_check.timeout;

        let started = std::time::Instant::now();
        let result = tokio::time::timeout(timeout, sqlx::query("SELECT 1").execute(&self.pool)).await;

        match result {
            Ok(Ok(_)) => HealthCheckResult::healthy(started.elapsed()),
            Ok(Err(err)) => HealthCheckResult::unhealthy(err.to_string()),
            Err(_) => HealthCheckResult::unhealthy("timeout".to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error(transparent)]
    Config(#[from] DbConfigError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
