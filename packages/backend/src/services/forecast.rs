use std::time::Duration;

use chrono::{DateTime, Utc};
use shikkha_forecast::{compute_forecast, Forecast, ForecastInput};
use thiserror::Error;
use uuid::Uuid;

use crate::config::ForecastConfig;
use crate::db::activity;
use crate::db::DatabaseProxy;

#[derive(Debug, Error)]
pub enum ActivityStoreError {
    #[error("activity store not configured")]
    NotConfigured,
    #[error("activity store read timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

/// Reads one learner's window from the store and runs the forecast.
///
/// The read is a single bounded request; dropping the future cancels it.
pub async fn forecast_for_user(
    proxy: Option<&DatabaseProxy>,
    config: &ForecastConfig,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Forecast, ActivityStoreError> {
    let proxy = proxy.ok_or(ActivityStoreError::NotConfigured)?;
    let since = window_start(config, now);

    let input = tokio::time::timeout(
        config.query_timeout,
        activity::load_forecast_input(proxy.pool(), user_id, since),
    )
    .await
    .map_err(|_| ActivityStoreError::Timeout(config.query_timeout))??;

    Ok(forecast_from_input(&input, config, now))
}

pub fn forecast_from_input(
    input: &ForecastInput,
    config: &ForecastConfig,
    now: DateTime<Utc>,
) -> Forecast {
    compute_forecast(input, &config.options_at(now))
}

/// Lower bound for the store query. One extra day covers the local-day cut;
/// the core discards anything older than its own window.
fn window_start(config: &ForecastConfig, now: DateTime<Utc>) -> DateTime<Utc> {
    now - chrono::Duration::days(i64::from(config.window_days) + 1)
}
