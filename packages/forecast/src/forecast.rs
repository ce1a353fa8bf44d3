//! Forecast entry points.
//!
//! `compute_forecast` re-derives everything from one input snapshot; nothing
//! is cached between calls, so concurrent calls for the same learner are
//! safe and independent users can be evaluated in parallel.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::scenario::{self, ForecastScenario, TopicForecast};
use crate::types::{
    ActivityRecord, MasteryTrend, PendingRevision, TopicMasteryRecord, DEFAULT_UTC_OFFSET_SECONDS,
    DEFAULT_WINDOW_DAYS,
};
use crate::velocity::{self, ActivityWindow, VelocityProfile};

/// Snapshot read from the Activity Store for one learner
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastInput {
    #[serde(default)]
    pub mastery_records: Vec<TopicMasteryRecord>,
    #[serde(default)]
    pub pending_revisions: Vec<PendingRevision>,
    #[serde(default)]
    pub activity_records: Vec<ActivityRecord>,
    #[serde(default)]
    pub current_streak_days: i64,
    #[serde(default)]
    pub current_total_xp: i64,
}

#[derive(Clone, Debug)]
pub struct ForecastOptions {
    pub now: DateTime<Utc>,
    /// Offset used to cut local calendar days
    pub utc_offset: FixedOffset,
    pub window_days: u32,
}

impl ForecastOptions {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now,
            utc_offset: default_offset(),
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    pub fn with_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days.max(1);
        self
    }

    fn window(&self) -> ActivityWindow {
        ActivityWindow::new(self.now, self.utc_offset, self.window_days)
    }
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// round(average mastery × study consistency), 0-100
    pub overall_confidence: i64,
    pub mastery_trend: MasteryTrend,
    pub top_weak_topic: Option<String>,
    pub average_retention_days: i64,
    pub scenarios: Vec<ForecastScenario>,
    pub topic_forecasts: Vec<TopicForecast>,
    pub velocity_profile: VelocityProfile,
}

pub fn compute_forecast(input: &ForecastInput, options: &ForecastOptions) -> Forecast {
    let profile = velocity::compute_profile(
        &input.activity_records,
        input.current_streak_days,
        input.current_total_xp,
        &options.window(),
    );

    let consistency = profile.study_consistency;
    let mastery_trend = MasteryTrend::from(profile.velocity_trend);
    let retention = scenario::average_retention_days(&input.pending_revisions);
    let overall_confidence =
        (scenario::average_mastery(&input.mastery_records) * consistency).round() as i64;

    tracing::debug!(
        records = input.activity_records.len(),
        topics = input.mastery_records.len(),
        velocity = profile.current_velocity,
        trend = profile.velocity_trend.as_str(),
        mastery_trend = mastery_trend.as_str(),
        momentum = profile.momentum_level.as_str(),
        overall_confidence,
        "forecast computed"
    );

    Forecast {
        overall_confidence,
        mastery_trend,
        top_weak_topic: scenario::top_weak_topic(&input.mastery_records),
        average_retention_days: retention.round() as i64,
        scenarios: scenario::project_scenarios(mastery_trend, retention),
        topic_forecasts: scenario::topic_forecasts(&input.mastery_records, consistency, options.now),
        velocity_profile: profile,
    }
}

/// Batch compute forecasts for independent learners using Rayon
pub fn compute_forecasts(inputs: &[ForecastInput], options: &ForecastOptions) -> Vec<Forecast> {
    inputs
        .par_iter()
        .map(|input| compute_forecast(input, options))
        .collect()
}
