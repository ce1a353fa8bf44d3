use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::db::HealthCheckSnapshot;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/info", get(info))
        .route("/live", get(live))
        .route("/database", get(database))
}

async fn root(State(state): State<AppState>) -> Response {
    let db_status = database_check(&state).await;
    let ok = matches!(db_status, DbCheckStatus::Connected);

    let response = HealthResponse {
        status: if ok { "ok" } else { "degraded" },
        database: db_status.as_str(),
        timestamp: now_iso(),
    };

    let status_code = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response)).into_response()
}

async fn info(State(state): State<AppState>) -> Response {
    let forecast = state.forecast_config();

    let response = HealthInfoResponse {
        service: env!("CARGO_PKG_NAME"),
        version: std::env::var("APP_VERSION")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        start_time: system_time_iso(state.started_at_system()),
        uptime: state.uptime_seconds(),
        forecast_window_days: forecast.window_days,
        forecast_utc_offset_minutes: forecast.utc_offset_minutes,
        activity_store_configured: state.db_proxy().is_some(),
    };

    Json(response).into_response()
}

async fn live(State(state): State<AppState>) -> Response {
    let response = LivenessResponse {
        status: "healthy",
        timestamp: now_iso(),
        uptime: state.uptime_seconds(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

async fn database(State(state): State<AppState>) -> Response {
    let Some(proxy) = state.db_proxy() else {
        let response = DatabaseResponse {
            configured: false,
            status: None,
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response();
    };

    let snapshot = proxy.health_status().await;
    let status_code = if snapshot.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let response = DatabaseResponse {
        configured: true,
        status: Some(snapshot),
    };

    (status_code, Json(response)).into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthInfoResponse {
    service: &'static str,
    version: String,
    start_time: String,
    uptime: u64,
    forecast_window_days: u32,
    forecast_utc_offset_minutes: i32,
    activity_store_configured: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LivenessResponse {
    status: &'static str,
    timestamp: String,
    uptime: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseResponse {
    configured: bool,
    status: Option<HealthCheckSnapshot>,
}

enum DbCheckStatus {
    Connected,
    Timeout,
    Disconnected,
}

impl DbCheckStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Timeout => "timeout",
            Self::Disconnected => "disconnected",
        }
    }
}

async fn database_check(state: &AppState) -> DbCheckStatus {
    let Some(proxy) = state.db_proxy() else {
        return DbCheckStatus::Disconnected;
    };

    let snapshot = proxy.health_status().await;
    if snapshot.healthy {
        return DbCheckStatus::Connected;
    }
    if snapshot.error.as_deref() == Some("timeout") {
        return DbCheckStatus::Timeout;
    }
    DbCheckStatus::Disconnected
}

fn system_time_iso(time: std::time::SystemTime) -> String {
    let datetime: chrono::DateTime<chrono::Utc> = time.into();
    datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn now_iso() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
