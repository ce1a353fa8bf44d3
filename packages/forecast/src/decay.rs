//! Mastery Decay Estimator
//!
//! Projects a topic's mastery 14 days ahead under a fixed linear decay of
//! 10 points per day without practice. The projection switches between two
//! discrete branches on study consistency; the branches are never blended.

use serde::Serialize;

use crate::sanitize::{clamp_mastery, clamp_unit};

/// Fraction of mastery lost per day without practice
pub const DECAY_RATE: f64 = 0.10;

/// Horizon of the projected mastery (days)
pub const PROJECTION_HORIZON_DAYS: f64 = 14.0;

/// Consistency strictly above this switches to the growth branch
pub const GROWTH_CONSISTENCY_THRESHOLD: f64 = 0.5;

/// Mastery gained over the horizon on the growth branch
pub const GROWTH_GAIN: f64 = 10.0;

/// Mastery points one revision is assumed to restore
pub const MASTERY_PER_REVISION: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecayEstimate {
    pub projected_mastery: f64,
    pub days_until_forgotten: i64,
    pub revisions_needed: i64,
    /// True when the growth branch was taken
    pub reinforced: bool,
}

/// Days until mastery reaches zero at the baseline decay rate
pub fn baseline_days_until_forgotten(mastery_score: f64) -> i64 {
    let mastery = clamp_mastery(mastery_score);
    (mastery / (DECAY_RATE * 100.0)).ceil() as i64
}

pub fn revisions_needed(mastery_score: f64) -> i64 {
    let mastery = clamp_mastery(mastery_score);
    ((crate::types::MAX_MASTERY - mastery) / MASTERY_PER_REVISION).ceil() as i64
}

/// Estimate a topic's future mastery.
///
/// # Arguments
/// * `mastery_score` - current mastery, clamped into [0, 100]
/// * `study_consistency` - recent practice ratio, clamped into [0, 1]
pub fn estimate(mastery_score: f64, study_consistency: f64) -> DecayEstimate {
    let mastery = clamp_mastery(mastery_score);
    let consistency = clamp_unit(study_consistency);
    let baseline = baseline_days_until_forgotten(mastery);

    let reinforced = consistency > GROWTH_CONSISTENCY_THRESHOLD;
    let (projected_mastery, days_until_forgotten) = if reinforced {
        ((mastery + GROWTH_GAIN).min(crate::types::MAX_MASTERY), baseline * 2)
    } else {
        let horizon_loss = DECAY_RATE * 100.0 * PROJECTION_HORIZON_DAYS;
        ((mastery - horizon_loss).max(0.0), baseline)
    };

    DecayEstimate {
        projected_mastery,
        days_until_forgotten,
        revisions_needed: revisions_needed(mastery),
        reinforced,
    }
}
