use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::config::ForecastConfig;
use crate::db::DatabaseProxy;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    db_proxy: Option<Arc<DatabaseProxy>>,
    forecast: Arc<ForecastConfig>,
}

impl AppState {
    pub fn new(db_proxy: Option<Arc<DatabaseProxy>>, forecast: ForecastConfig) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            db_proxy,
            forecast: Arc::new(forecast),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn db_proxy(&self) -> Option<Arc<DatabaseProxy>> {
        self.db_proxy.clone()
    }

    pub fn forecast_config(&self) -> &ForecastConfig {
        &self.forecast
    }
}
