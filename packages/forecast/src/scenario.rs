//! Scenario Projector
//!
//! Three fixed "what-if" futures for the dashboard, and the per-topic
//! forecast list. Only the `current` scenario depends on the computed trend;
//! the other two are constants scaled by the average revision interval.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decay;
use crate::sanitize::{clamp_mastery, non_negative};
use crate::types::{ConfidenceLevel, Language, MasteryTrend, PendingRevision, TopicMasteryRecord};

/// Used when the scheduler has no pending revisions
pub const DEFAULT_RETENTION_DAYS: f64 = 7.0;

/// Topics shown in the per-topic forecast
pub const MAX_TOPIC_FORECASTS: usize = 5;

const IMPROVED_MASTERY_CHANGE: i32 = 25;
const IMPROVED_RETENTION_FACTOR: f64 = 2.5;
const NEGLECTED_MASTERY_CHANGE: i32 = -35;
const NEGLECTED_RETENTION_FACTOR: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioId {
    Current,
    Improved,
    Neglected,
}

impl ScenarioId {
    pub fn title(&self, language: Language) -> &'static str {
        match (self, language) {
            (Self::Current, Language::En) => "Current pace",
            (Self::Current, Language::Bn) => "বর্তমান গতি",
            (Self::Improved, Language::En) => "+10 minutes daily revision",
            (Self::Improved, Language::Bn) => "প্রতিদিন +১০ মিনিট রিভিশন",
            (Self::Neglected, Language::En) => "Skip revision for 2 weeks",
            (Self::Neglected, Language::Bn) => "২ সপ্তাহ রিভিশন বাদ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastScenario {
    pub id: ScenarioId,
    pub mastery_change_percent: i32,
    pub days_until_decay: i64,
    pub confidence_level: ConfidenceLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicForecast {
    pub topic_name: String,
    pub current_mastery: f64,
    pub projected_mastery: f64,
    pub days_until_forgotten: i64,
    pub revisions_needed: i64,
    pub is_weak_topic: bool,
    pub days_since_practice: Option<i64>,
}

/// Mean configured review interval, or 7 days when nothing is pending
pub fn average_retention_days(pending: &[PendingRevision]) -> f64 {
    if pending.is_empty() {
        return DEFAULT_RETENTION_DAYS;
    }
    let sum: f64 = pending
        .iter()
        .map(|r| non_negative(r.review_interval_days))
        .sum();
    sum / pending.len() as f64
}

fn current_pace(trend: MasteryTrend) -> (i32, ConfidenceLevel) {
    match trend {
        MasteryTrend::Rising => (15, ConfidenceLevel::High),
        MasteryTrend::Stable => (0, ConfidenceLevel::Medium),
        MasteryTrend::Declining => (-20, ConfidenceLevel::Low),
    }
}

pub fn project_scenarios(trend: MasteryTrend, average_retention_days: f64) -> Vec<ForecastScenario> {
    let retention = non_negative(average_retention_days);
    let (current_change, current_confidence) = current_pace(trend);

    vec![
        ForecastScenario {
            id: ScenarioId::Current,
            mastery_change_percent: current_change,
            days_until_decay: retention.round() as i64,
            confidence_level: current_confidence,
        },
        ForecastScenario {
            id: ScenarioId::Improved,
            mastery_change_percent: IMPROVED_MASTERY_CHANGE,
            days_until_decay: (retention * IMPROVED_RETENTION_FACTOR).round() as i64,
            confidence_level: ConfidenceLevel::High,
        },
        ForecastScenario {
            id: ScenarioId::Neglected,
            mastery_change_percent: NEGLECTED_MASTERY_CHANGE,
            days_until_decay: (retention * NEGLECTED_RETENTION_FACTOR).round() as i64,
            confidence_level: ConfidenceLevel::Low,
        },
    ]
}

/// Records sorted by clamped mastery, lowest first; input order kept on ties.
fn by_mastery_ascending(records: &[TopicMasteryRecord]) -> Vec<&TopicMasteryRecord> {
    let mut sorted: Vec<&TopicMasteryRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        clamp_mastery(a.mastery_score)
            .partial_cmp(&clamp_mastery(b.mastery_score))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted
}

/// Forecast the weakest topics.
///
/// Every topic uses the learner's global study consistency; sessions are
/// not attributed to topics in the Activity Store schema.
pub fn topic_forecasts(
    records: &[TopicMasteryRecord],
    study_consistency: f64,
    now: DateTime<Utc>,
) -> Vec<TopicForecast> {
    by_mastery_ascending(records)
        .into_iter()
        .take(MAX_TOPIC_FORECASTS)
        .map(|record| {
            let mastery = clamp_mastery(record.mastery_score);
            let estimate = decay::estimate(mastery, study_consistency);
            TopicForecast {
                topic_name: record.topic_name.clone(),
                current_mastery: mastery,
                projected_mastery: estimate.projected_mastery,
                days_until_forgotten: estimate.days_until_forgotten,
                revisions_needed: estimate.revisions_needed,
                is_weak_topic: record.is_weak_topic,
                days_since_practice: record
                    .last_practiced_at
                    .map(|ts| (now - ts).num_days().max(0)),
            }
        })
        .collect()
}

/// Weakest flagged topic, if any topic is flagged
pub fn top_weak_topic(records: &[TopicMasteryRecord]) -> Option<String> {
    by_mastery_ascending(records)
        .into_iter()
        .find(|r| r.is_weak_topic)
        .map(|r| r.topic_name.clone())
}

pub fn average_mastery(records: &[TopicMasteryRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| clamp_mastery(r.mastery_score)).sum::<f64>() / records.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn topic(name: &str, mastery: f64, weak: bool) -> TopicMasteryRecord {
        TopicMasteryRecord {
            topic_name: name.to_string(),
            mastery_score: mastery,
            attempts: 3,
            last_practiced_at: None,
            is_weak_topic: weak,
        }
    }

    #[test]
    fn test_default_retention() {
        assert_eq!(average_retention_days(&[]), DEFAULT_RETENTION_DAYS);
    }

    #[test]
    fn test_retention_mean() {
        let pending = vec![
            PendingRevision { review_interval_days: 3.0 },
            PendingRevision { review_interval_days: 6.0 },
            PendingRevision { review_interval_days: -4.0 },
        ];
        assert!((average_retention_days(&pending) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_current_scenario_follows_trend() {
        let rising = project_scenarios(MasteryTrend::Rising, 7.0);
        assert_eq!(rising[0].mastery_change_percent, 15);
        assert_eq!(rising[0].confidence_level, ConfidenceLevel::High);

        let stable = project_scenarios(MasteryTrend::Stable, 7.0);
        assert_eq!(stable[0].mastery_change_percent, 0);
        assert_eq!(stable[0].confidence_level, ConfidenceLevel::Medium);

        let declining = project_scenarios(MasteryTrend::Declining, 7.0);
        assert_eq!(declining[0].mastery_change_percent, -20);
        assert_eq!(declining[0].confidence_level, ConfidenceLevel::Low);
    }

    #[test]
    fn test_fixed_scenarios() {
        let scenarios = project_scenarios(MasteryTrend::Declining, 7.0);
        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[0].days_until_decay, 7);

        let improved = &scenarios[1];
        assert_eq!(improved.id, ScenarioId::Improved);
        assert_eq!(improved.mastery_change_percent, 25);
        assert_eq!(improved.confidence_level, ConfidenceLevel::High);
        assert_eq!(improved.days_until_decay, 18);

        let neglected = &scenarios[2];
        assert_eq!(neglected.id, ScenarioId::Neglected);
        assert_eq!(neglected.mastery_change_percent, -35);
        assert_eq!(neglected.confidence_level, ConfidenceLevel::Low);
        assert_eq!(neglected.days_until_decay, 2);
    }

    #[test]
    fn test_topic_forecasts_lowest_first_and_capped() {
        let records = vec![
            topic("Algebra", 70.0, false),
            topic("Geometry", 20.0, true),
            topic("Physics", 55.0, false),
            topic("Chemistry", 90.0, false),
            topic("Biology", 35.0, true),
            topic("Bangla Grammar", 45.0, false),
        ];
        let forecasts = topic_forecasts(&records, 0.8, Utc::now());
        let names: Vec<&str> = forecasts.iter().map(|f| f.topic_name.as_str()).collect();
        assert_eq!(names, vec!["Geometry", "Biology", "Bangla Grammar", "Physics", "Algebra"]);
        assert!((forecasts[0].projected_mastery - 30.0).abs() < 1e-10);
        assert_eq!(forecasts[0].days_until_forgotten, 4);
        assert_eq!(forecasts[0].revisions_needed, 4);
    }

    #[test]
    fn test_days_since_practice() {
        let now = Utc::now();
        let mut record = topic("ICT", 60.0, false);
        record.last_practiced_at = Some(now - Duration::days(3) - Duration::hours(2));
        let forecasts = topic_forecasts(&[record], 0.0, now);
        assert_eq!(forecasts[0].days_since_practice, Some(3));
    }

    #[test]
    fn test_top_weak_topic() {
        let records = vec![
            topic("Algebra", 10.0, false),
            topic("Geometry", 40.0, true),
            topic("Biology", 30.0, true),
        ];
        assert_eq!(top_weak_topic(&records), Some("Biology".to_string()));
        assert_eq!(top_weak_topic(&[topic("Algebra", 10.0, false)]), None);
        assert_eq!(top_weak_topic(&[]), None);
    }

    #[test]
    fn test_average_mastery_clamps() {
        let records = vec![topic("A", 150.0, false), topic("B", -20.0, false)];
        assert!((average_mastery(&records) - 50.0).abs() < 1e-10);
        assert_eq!(average_mastery(&[]), 0.0);
    }

    #[test]
    fn test_titles() {
        assert_eq!(ScenarioId::Current.title(Language::En), "Current pace");
        assert_eq!(ScenarioId::Neglected.title(Language::Bn), "২ সপ্তাহ রিভিশন বাদ");
    }
}
