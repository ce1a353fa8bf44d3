use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{body_json, get, post_json, send};

const USER_ID: &str = "6f1c2a9e-3b4d-4e5f-8a7b-9c0d1e2f3a4b";

#[tokio::test]
async fn test_health_root_without_store() {
    let app = common::create_test_app().await;
    let response = send(app, get("/health")).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_health_live() {
    let response = send(common::create_offline_app(), get("/health/live")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_info() {
    let response = send(common::create_offline_app(), get("/api/health/info")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["forecastWindowDays"], 14);
    assert_eq!(body["forecastUtcOffsetMinutes"], 360);
    assert_eq!(body["activityStoreConfigured"], false);
}

#[tokio::test]
async fn test_user_forecast_without_store_is_unavailable() {
    let uri = format!("/api/users/{USER_ID}/forecast?lang=bn");
    let response = send(common::create_offline_app(), get(&uri)).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "DATA_UNAVAILABLE");
}

#[tokio::test]
async fn test_user_forecast_rejects_bad_user_id() {
    let response = send(
        common::create_offline_app(),
        get("/api/users/not-a-uuid/forecast"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_compute_empty_input() {
    let response = send(
        common::create_offline_app(),
        post_json("/api/forecast/compute", "{}"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = &body["data"];
    assert_eq!(body["success"], true);
    assert_eq!(data["overallConfidence"], 0);
    assert_eq!(data["averageRetentionDays"], 7);
    assert!(data["topWeakTopic"].is_null());
    assert_eq!(data["velocityProfile"]["momentumLevel"], "stalled");
    assert_eq!(data["velocityProfile"]["dailyActivity"].as_array().unwrap().len(), 7);
    assert_eq!(data["language"], "en");
    assert_eq!(data["labels"]["scenarios"][0]["title"], "Current pace");
}

#[tokio::test]
async fn test_compute_with_activity() {
    let body = json!({
        "now": "2024-03-15T12:00:00Z",
        "currentStreakDays": 4,
        "currentTotalXp": 450,
        "masteryRecords": [
            {"topicName": "Algebra", "masteryScore": 35, "isWeakTopic": true},
            {"topicName": "Optics", "masteryScore": 80}
        ],
        "pendingRevisions": [
            {"reviewIntervalDays": 4},
            {"reviewIntervalDays": 8}
        ],
        "activityRecords": [
            {"kind": "session", "xpEarned": 100, "durationMinutes": 120, "createdAt": "2024-03-15T04:00:00Z"},
            {"kind": "session", "xpEarned": 100, "durationMinutes": 120, "createdAt": "2024-03-14T04:00:00Z"},
            {"kind": "session", "xpEarned": 100, "durationMinutes": 120, "createdAt": "2024-03-13T04:00:00Z"}
        ]
    });

    let response = send(
        common::create_offline_app(),
        post_json("/api/forecast/compute?lang=bn", body.to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = &body["data"];
    assert_eq!(data["velocityProfile"]["currentVelocity"], 50.0);
    assert_eq!(data["velocityProfile"]["efficiencyScore"], 100);
    assert_eq!(data["averageRetentionDays"], 6);
    assert_eq!(data["topWeakTopic"], "Algebra");
    assert_eq!(data["topicForecasts"][0]["topicName"], "Algebra");
    assert_eq!(data["language"], "bn");
    assert_eq!(data["labels"]["scenarios"][1]["title"], "প্রতিদিন +১০ মিনিট রিভিশন");
    assert_eq!(data["labels"]["optimalStudyWindow"], "10:00-12:00");
}

#[tokio::test]
async fn test_compute_malformed_body() {
    let response = send(
        common::create_offline_app(),
        post_json("/api/forecast/compute", "{\"activityRecords\": 3"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let response = send(common::create_offline_app(), get("/api/does-not-exist")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}
