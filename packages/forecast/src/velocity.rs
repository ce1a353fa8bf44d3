//! Velocity / Momentum Calculator
//!
//! Aggregates a rolling window of sessions and assessments into a
//! throughput profile:
//!
//! - **velocity**: xp earned per hour of recorded study
//! - **trend**: recent 7 days against the 7 days before, with a ±10% dead-band
//! - **consistency**: share of the recent 7 days with any activity
//! - **momentum**: first-match rule cascade over trend and active days
//! - **peaks**: hour of day and day of week with the most xp
//!
//! Every division is guarded; an empty window yields a zeroed profile with
//! momentum `stalled`.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::milestone::{self, NextMilestone};
use crate::sanitize::{clamp_to_now, non_negative, non_negative_xp};
use crate::types::{ActivityRecord, MomentumLevel, VelocityTrend, SUB_WINDOW_DAYS};

/// velocity_change above this is "up", below its negation "down"
pub const TREND_THRESHOLD_PERCENT: f64 = 10.0;

/// Streak bonus per consecutive day
pub const STREAK_BONUS_PER_DAY: f64 = 0.05;

/// Maximum streak bonus
pub const MAX_STREAK_BONUS: f64 = 0.5;

/// Velocity mapped to 100% efficiency is 50 xp/hour
pub const EFFICIENCY_SCALE: f64 = 2.0;

/// Length of the suggested study window starting at the peak hour
pub const STUDY_WINDOW_HOURS: u32 = 2;

/// Number of points in the dashboard activity chart
pub const CHART_DAYS: u32 = 7;

/// Sunday-first order used for the peak-day buckets
pub const SUNDAY_FIRST: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// One local calendar day of activity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub xp: i64,
    pub minutes: f64,
    pub session_count: u32,
}

impl DailyMetric {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            xp: 0,
            minutes: 0.0,
            session_count: 0,
        }
    }
}

/// Suggested two-hour study slot, local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl StudyWindow {
    pub fn starting_at(hour: u32) -> Self {
        let start_hour = hour % 24;
        Self {
            start_hour,
            end_hour: (start_hour + STUDY_WINDOW_HOURS) % 24,
        }
    }
}

impl std::fmt::Display for StudyWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00-{:02}:00", self.start_hour, self.end_hour)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityProfile {
    pub current_velocity: f64,
    pub velocity_trend: VelocityTrend,
    pub velocity_change: f64,
    pub momentum_level: MomentumLevel,
    pub peak_hour: Option<u32>,
    pub peak_day: Option<Weekday>,
    pub predicted_weekly_xp: i64,
    pub optimal_study_window: Option<StudyWindow>,
    pub focus_score: u32,
    pub consistency_score: u32,
    pub efficiency_score: u32,
    pub streak_multiplier: f64,
    pub next_milestone: NextMilestone,
    /// Active days in the recent sub-window over its length, in [0, 1]
    pub study_consistency: f64,
    pub days_with_activity: u32,
    pub avg_daily_xp: f64,
    pub total_xp: i64,
    pub total_minutes: f64,
    /// Last seven local days, oldest first, empty days included
    pub daily_activity: Vec<DailyMetric>,
}

/// Window bounds resolved against the caller's clock and timezone
#[derive(Debug, Clone, Copy)]
pub struct ActivityWindow {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
    pub days: u32,
}

impl ActivityWindow {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset, days: u32) -> Self {
        Self {
            now,
            offset,
            days: days.max(1),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now.with_timezone(&self.offset).date_naive()
    }

    /// Local calendar day of a record, with future timestamps pulled back to now
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        clamp_to_now(ts, self.now)
            .with_timezone(&self.offset)
            .date_naive()
    }

    /// Whole local days between the record and today; `None` outside the window
    pub fn days_ago(&self, ts: DateTime<Utc>) -> Option<u32> {
        let days = (self.today() - self.local_date(ts)).num_days();
        if days >= 0 && days < self.days as i64 {
            Some(days as u32)
        } else {
            None
        }
    }
}

/// Group records by local calendar day. Days without activity are absent.
pub fn group_by_day(
    records: &[ActivityRecord],
    window: &ActivityWindow,
) -> BTreeMap<NaiveDate, DailyMetric> {
    let mut daily: BTreeMap<NaiveDate, DailyMetric> = BTreeMap::new();

    for record in records {
        if window.days_ago(record.timestamp()).is_none() {
            continue;
        }
        let date = window.local_date(record.timestamp());
        let entry = daily.entry(date).or_insert_with(|| DailyMetric::empty(date));
        entry.xp = entry.xp.saturating_add(non_negative_xp(record.xp_earned()));
        entry.minutes += non_negative(record.duration_minutes());
        if record.is_session() {
            entry.session_count += 1;
        }
    }

    daily
}

/// The last `CHART_DAYS` local days, oldest first, materialising empty days.
pub fn chart_series(
    daily: &BTreeMap<NaiveDate, DailyMetric>,
    today: NaiveDate,
) -> Vec<DailyMetric> {
    (0..CHART_DAYS as i64)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            daily
                .get(&date)
                .cloned()
                .unwrap_or_else(|| DailyMetric::empty(date))
        })
        .collect()
}

pub fn velocity(total_xp: i64, total_minutes: f64) -> f64 {
    if total_minutes > 0.0 {
        total_xp as f64 / (total_minutes / 60.0)
    } else {
        0.0
    }
}

pub fn velocity_change(recent_xp: i64, older_xp: i64) -> f64 {
    if older_xp > 0 {
        (recent_xp as f64 - older_xp as f64) / older_xp as f64 * 100.0
    } else {
        0.0
    }
}

/// ±10 exactly stays stable
pub fn classify_trend(change: f64) -> VelocityTrend {
    if change > TREND_THRESHOLD_PERCENT {
        VelocityTrend::Up
    } else if change < -TREND_THRESHOLD_PERCENT {
        VelocityTrend::Down
    } else {
        VelocityTrend::Stable
    }
}

/// First match wins; the conditions overlap.
pub fn classify_momentum(trend: VelocityTrend, days_with_activity: u32) -> MomentumLevel {
    if trend == VelocityTrend::Up && days_with_activity >= 5 {
        MomentumLevel::Accelerating
    } else if trend == VelocityTrend::Stable && days_with_activity >= 4 {
        MomentumLevel::Steady
    } else if days_with_activity < 2 {
        MomentumLevel::Stalled
    } else if trend == VelocityTrend::Down || days_with_activity < 3 {
        MomentumLevel::Slowing
    } else {
        MomentumLevel::Steady
    }
}

pub fn streak_multiplier(current_streak_days: i64) -> f64 {
    let days = current_streak_days.max(0) as f64;
    1.0 + (days * STREAK_BONUS_PER_DAY).min(MAX_STREAK_BONUS)
}

pub fn efficiency_score(current_velocity: f64) -> u32 {
    (non_negative(current_velocity) * EFFICIENCY_SCALE).round().min(100.0) as u32
}

pub fn consistency_score(active_days: u32, window_days: u32) -> u32 {
    let window = window_days.max(1) as f64;
    (active_days as f64 / window * 100.0).round().min(100.0) as u32
}

pub fn focus_score(consistency_score: u32, efficiency_score: u32) -> u32 {
    ((consistency_score + efficiency_score) as f64 / 2.0).round() as u32
}

pub fn predicted_weekly_xp(avg_daily_xp: f64, velocity_change: f64) -> i64 {
    (avg_daily_xp * 7.0 * (1.0 + velocity_change / 200.0)).round() as i64
}

/// Index of the largest bucket among those that saw a record; lowest index on ties.
fn peak_bucket(xp: &[i64], seen: &[bool]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, (&value, &hit)) in xp.iter().zip(seen.iter()).enumerate() {
        if !hit {
            continue;
        }
        match best {
            Some(current) if xp[current] >= value => {}
            _ => best = Some(idx),
        }
    }
    best
}

/// Build the velocity profile for one learner.
///
/// # Arguments
/// * `records` - sessions and assessments; anything outside the window is ignored
/// * `current_streak_days` - consecutive-day streak from the profile
/// * `current_total_xp` - lifetime xp, used for the milestone lookup
/// * `window` - clock, local offset and window length
pub fn compute_profile(
    records: &[ActivityRecord],
    current_streak_days: i64,
    current_total_xp: i64,
    window: &ActivityWindow,
) -> VelocityProfile {
    let today = window.today();
    let daily = group_by_day(records, window);

    let mut total_xp = 0_i64;
    let mut total_minutes = 0.0_f64;
    let mut recent_xp = 0_i64;
    let mut older_xp = 0_i64;
    let mut days_with_activity = 0_u32;

    for metric in daily.values() {
        total_xp = total_xp.saturating_add(metric.xp);
        total_minutes += metric.minutes;

        let back = (today - metric.date).num_days();
        if back < SUB_WINDOW_DAYS as i64 {
            recent_xp = recent_xp.saturating_add(metric.xp);
            days_with_activity += 1;
        } else if back < 2 * SUB_WINDOW_DAYS as i64 {
            older_xp = older_xp.saturating_add(metric.xp);
        }
    }

    let mut hour_xp = [0_i64; 24];
    let mut hour_seen = [false; 24];
    let mut day_xp = [0_i64; 7];
    let mut day_seen = [false; 7];
    for record in records {
        if window.days_ago(record.timestamp()).is_none() {
            continue;
        }
        let local = clamp_to_now(record.timestamp(), window.now).with_timezone(&window.offset);
        let hour = local.hour() as usize;
        let day = local.weekday().num_days_from_sunday() as usize;
        let xp = non_negative_xp(record.xp_earned());
        hour_xp[hour] = hour_xp[hour].saturating_add(xp);
        hour_seen[hour] = true;
        day_xp[day] = day_xp[day].saturating_add(xp);
        day_seen[day] = true;
    }
    let peak_hour = peak_bucket(&hour_xp, &hour_seen).map(|h| h as u32);
    let peak_day = peak_bucket(&day_xp, &day_seen).map(|d| SUNDAY_FIRST[d]);

    let current_velocity = velocity(total_xp, total_minutes);
    let change = velocity_change(recent_xp, older_xp);
    let trend = classify_trend(change);
    let momentum = classify_momentum(trend, days_with_activity);
    let study_consistency = (days_with_activity as f64 / SUB_WINDOW_DAYS as f64).min(1.0);

    let avg_daily_xp = total_xp as f64 / window.days as f64;
    let consistency = consistency_score(daily.len() as u32, window.days);
    let efficiency = efficiency_score(current_velocity);

    VelocityProfile {
        current_velocity,
        velocity_trend: trend,
        velocity_change: change,
        momentum_level: momentum,
        peak_hour,
        peak_day,
        predicted_weekly_xp: predicted_weekly_xp(avg_daily_xp, change),
        optimal_study_window: peak_hour.map(StudyWindow::starting_at),
        focus_score: focus_score(consistency, efficiency),
        consistency_score: consistency,
        efficiency_score: efficiency,
        streak_multiplier: streak_multiplier(current_streak_days),
        next_milestone: milestone::next_milestone(current_total_xp, avg_daily_xp),
        study_consistency,
        days_with_activity,
        avg_daily_xp,
        total_xp,
        total_minutes,
        daily_activity: chart_series(&daily, today),
    }
}
