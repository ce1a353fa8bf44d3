use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::db::config::HealthCheckConfig;

#[derive(Debug, Clone)]
pub struct HealthCheckResult {
    pub healthy: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
    pub timestamp_ms: u64,
}

impl HealthCheckResult {
    pub fn healthy(latency: Duration) -> Self {
        Self {
            healthy: true,
            latency_ms: Some(latency.as_millis() as u64),
            error: None,
            timestamp_ms: now_ms(),
        }
    }

    pub fn unhealthy(error: String) -> Self {
        Self {
            healthy: false,
            latency_ms: None,
            error: Some(error),
            timestamp_ms: now_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckSnapshot {
    pub healthy: bool,
    pub degraded: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
    pub timestamp_ms: Option<u64>,
    pub consecutive_failures: u32,
}

/// Last probe result plus a failure streak for the Activity Store pool
#[derive(Debug)]
pub struct HealthTracker {
    config: HealthCheckConfig,
    consecutive_failures: u32,
    last_result: Option<HealthCheckResult>,
}

impl HealthTracker {
    pub fn new(config: HealthCheckConfig) -> Self {
        Self {
            config,
            consecutive_failures: 0,
            last_result: None,
        }
    }

    pub fn process(&mut self, result: HealthCheckResult) {
        if result.healthy {
            if self.consecutive_failures > 0 {
                tracing::info!(
                    failures = self.consecutive_failures,
                    "activity store recovered"
                );
            }
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures = self.consecutive_failures.saturating_add(1);
            if self.consecutive_failures == self.config.failure_threshold {
                tracing::warn!(
                    failures = self.consecutive_failures,
                    error = result.error.as_deref().unwrap_or_default(),
                    "activity store marked degraded"
                );
            }
        }
        self.last_result = Some(result);
    }

    pub fn is_degraded(&self) -> bool {
        self.consecutive_failures >= self.config.failure_threshold
    }

    pub fn snapshot(&self) -> HealthCheckSnapshot {
        HealthCheckSnapshot {
            healthy: self.last_result.as_ref().map(|r| r.healthy).unwrap_or(false),
            degraded: self.is_degraded(),
            latency_ms: self.last_result.as_ref().and_then(|r| r.latency_ms),
            error: self.last_result.as_ref().and_then(|r| r.error.clone()),
            timestamp_ms: self.last_result.as_ref().map(|r| r.timestamp_ms),
            consecutive_failures: self.consecutive_failures,
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
