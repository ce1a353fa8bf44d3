use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub primary_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub health_check: HealthCheckConfig,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, DbConfigError> {
        let primary_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(DbConfigError::Missing {
                key: "DATABASE_URL",
            })?;

        Ok(Self {
            primary_url,
            max_connections: env_u32("DB_MAX_CONNECTIONS", 10).max(1),
            acquire_timeout: Duration::from_millis(env_u64("DB_ACQUIRE_TIMEOUT_MS", 5000)),
            health_check: HealthCheckConfig::from_env(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct HealthCheckConfig {
    pub interval: Duration,
    pub timeout: Duration,
    pub failure_threshold: u32,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(5000),
            timeout: Duration::from_millis(3000),
            failure_threshold: 3,
        }
    }
}

impl HealthCheckConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval: Duration::from_millis(env_u64(
                "DB_HEALTH_CHECK_INTERVAL_MS",
                defaults.interval.as_millis() as u64,
            )),
            timeout: Duration::from_millis(env_u64(
                "DB_HEALTH_CHECK_TIMEOUT_MS",
                defaults.timeout.as_millis() as u64,
            )),
            failure_threshold: env_u32("DB_FAILURE_THRESHOLD", defaults.failure_threshold),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbConfigError {
    #[error("missing env var {key}")]
    Missing { key: &'static str },
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}
