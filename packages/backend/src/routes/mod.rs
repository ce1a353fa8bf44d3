mod forecast;
mod health;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let healthcheck_endpoint = normalize_healthcheck_endpoint(
        std::env::var("HEALTHCHECK_ENDPOINT")
            .ok()
            .as_deref()
            .unwrap_or("/health"),
    );

    let mut app = Router::new()
        .route(
            "/api/users/:user_id/forecast",
            get(forecast::user_forecast).fallback(fallback_handler),
        )
        .route(
            "/api/forecast/compute",
            post(forecast::compute).fallback(fallback_handler),
        );

    let mut health_paths: Vec<String> = vec!["/health".to_string()];
    if healthcheck_endpoint.as_str() != "/health" {
        health_paths.push(healthcheck_endpoint);
    }
    if !health_paths.iter().any(|path| path == "/api/health") {
        health_paths.push("/api/health".to_string());
    }

    for path in &health_paths {
        app = app.nest(path.as_str(), health::router());
    }

    app.fallback(fallback_handler).with_state(state)
}

fn normalize_healthcheck_endpoint(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return "/health".to_string();
    }

    let with_slash = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    };

    with_slash.trim_end_matches('/').to_string()
}

async fn fallback_handler() -> Response {
    AppError::not_found("Route not found").into_response()
}
