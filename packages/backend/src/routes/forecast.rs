use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shikkha_forecast::{Forecast, ForecastInput, Language, ScenarioId};
use uuid::Uuid;

use crate::response::{AppError, SuccessResponse};
use crate::services::forecast as forecast_service;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    lang: Option<String>,
}

impl LanguageQuery {
    fn language(&self) -> Language {
        self.lang.as_deref().map(Language::parse).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequest {
    #[serde(flatten)]
    input: ForecastInput,
    #[serde(default)]
    now: Option<DateTime<Utc>>,
}

/// Forecast numbers plus display strings for the requested language
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastView {
    #[serde(flatten)]
    forecast: Forecast,
    language: Language,
    labels: ForecastLabels,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ForecastLabels {
    scenarios: Vec<ScenarioLabel>,
    next_milestone: &'static str,
    optimal_study_window: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScenarioLabel {
    id: ScenarioId,
    title: &'static str,
}

impl ForecastView {
    fn new(forecast: Forecast, language: Language) -> Self {
        let profile = &forecast.velocity_profile;
        let labels = ForecastLabels {
            scenarios: forecast
                .scenarios
                .iter()
                .map(|scenario| ScenarioLabel {
                    id: scenario.id,
                    title: scenario.id.title(language),
                })
                .collect(),
            next_milestone: profile.next_milestone.milestone.title(language),
            optimal_study_window: profile.optimal_study_window.map(|window| window.to_string()),
        };

        Self {
            forecast,
            language,
            labels,
        }
    }
}

pub async fn user_forecast(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = Uuid::parse_str(user_id.trim())
        .map_err(|_| AppError::bad_request("user id must be a UUID"))?;
    let language = query.language();

    let proxy = state.db_proxy();
    let forecast = forecast_service::forecast_for_user(
        proxy.as_deref(),
        state.forecast_config(),
        user_id,
        Utc::now(),
    )
    .await?;

    tracing::info!(
        %user_id,
        lang = ?language,
        momentum = forecast.velocity_profile.momentum_level.as_str(),
        "user forecast served"
    );

    Ok(SuccessResponse::ok(ForecastView::new(forecast, language)))
}

pub async fn compute(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
    payload: Result<Json<ComputeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let now = request.now.unwrap_or_else(Utc::now);

    let forecast = forecast_service::forecast_from_input(&request.input, state.forecast_config(), now);

    Ok(SuccessResponse::ok(ForecastView::new(forecast, query.language())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shikkha_forecast::{compute_forecast, ForecastOptions};

    fn empty_forecast() -> Forecast {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap();
        compute_forecast(&ForecastInput::default(), &ForecastOptions::at(now))
    }

    #[test]
    fn test_view_labels_follow_language() {
        let view = ForecastView::new(empty_forecast(), Language::Bn);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["language"], "bn");
        assert_eq!(json["labels"]["scenarios"][0]["id"], "current");
        assert_eq!(json["labels"]["scenarios"][0]["title"], "বর্তমান গতি");
        assert_eq!(json["labels"]["nextMilestone"], "প্রথম পদক্ষেপ");
        assert!(json["labels"]["optimalStudyWindow"].is_null());
        // numbers are flattened next to the labels
        assert_eq!(json["averageRetentionDays"], 7);
    }

    #[test]
    fn test_language_query_defaults_to_english() {
        assert_eq!(LanguageQuery::default().language(), Language::En);
        let query = LanguageQuery {
            lang: Some("BN".to_string()),
        };
        assert_eq!(query.language(), Language::Bn);
    }

    #[test]
    fn test_compute_request_accepts_optional_now() {
        let raw = r#"{"currentTotalXp": 120, "now": "2024-06-15T09:00:00Z"}"#;
        let request: ComputeRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.input.current_total_xp, 120);
        assert!(request.now.is_some());

        let request: ComputeRequest = serde_json::from_str("{}").unwrap();
        assert!(request.now.is_none());
        assert!(request.input.activity_records.is_empty());
    }
}
