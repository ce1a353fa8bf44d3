//! Input Sanitization
//!
//! The Activity Store is not validated upstream, so every numeric input is
//! clamped here before it reaches a formula.
//!
//! Functions:
//! - Mastery / ratio clamping
//! - Non-negative xp and durations
//! - Future timestamp clamping

use chrono::{DateTime, Utc};

use crate::types::MAX_MASTERY;

/// Replace NaN and infinities with zero
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Clamp a mastery score into [0, 100]
pub fn clamp_mastery(score: f64) -> f64 {
    finite_or_zero(score).clamp(0.0, MAX_MASTERY)
}

/// Clamp a ratio such as study consistency into [0, 1]
pub fn clamp_unit(ratio: f64) -> f64 {
    finite_or_zero(ratio).clamp(0.0, 1.0)
}

/// Durations and intervals never go below zero
pub fn non_negative(value: f64) -> f64 {
    finite_or_zero(value).max(0.0)
}

pub fn non_negative_xp(xp: i64) -> i64 {
    xp.max(0)
}

/// Timestamps reported in the future are treated as happening now
pub fn clamp_to_now(ts: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    ts.min(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_clamp_mastery() {
        assert_eq!(clamp_mastery(-5.0), 0.0);
        assert_eq!(clamp_mastery(140.0), 100.0);
        assert_eq!(clamp_mastery(f64::NAN), 0.0);
        assert_eq!(clamp_mastery(62.5), 62.5);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(1.7), 1.0);
        assert_eq!(clamp_unit(-0.1), 0.0);
        assert_eq!(clamp_unit(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(-30.0), 0.0);
        assert_eq!(non_negative_xp(-10), 0);
        assert_eq!(non_negative(12.0), 12.0);
    }

    #[test]
    fn test_future_timestamp_clamped() {
        let now = Utc::now();
        let future = now + Duration::days(3);
        assert_eq!(clamp_to_now(future, now), now);
        let past = now - Duration::hours(2);
        assert_eq!(clamp_to_now(past, now), past);
    }
}
