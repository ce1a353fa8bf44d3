//! Common Types and Constants
//!
//! Activity Store records consumed by the forecast, and the small
//! classification enums shared across modules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Default rolling window for the velocity profile (days)
pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Length of the "recent" and "older" sub-windows (days)
pub const SUB_WINDOW_DAYS: u32 = 7;

/// Bangladesh Standard Time, UTC+06:00
pub const DEFAULT_UTC_OFFSET_SECONDS: i32 = 6 * 3600;

/// Upper bound of a mastery score
pub const MAX_MASTERY: f64 = 100.0;

// ==================== Activity Store Records ====================

/// Per-topic mastery row
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMasteryRecord {
    pub topic_name: String,
    /// Running average of correctness, 0-100
    #[serde(default)]
    pub mastery_score: f64,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub last_practiced_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_weak_topic: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySessionRecord {
    #[serde(default)]
    pub xp_earned: i64,
    #[serde(default)]
    pub duration_minutes: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    #[serde(default)]
    pub xp_earned: i64,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub bloom_level: BloomLevel,
}

/// Bloom's taxonomy level of an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BloomLevel {
    #[default]
    Remember,
    Understand,
    Apply,
    Analyze,
    Evaluate,
    Create,
}

impl BloomLevel {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "understand" => Self::Understand,
            "apply" => Self::Apply,
            "analyze" | "analyse" => Self::Analyze,
            "evaluate" => Self::Evaluate,
            "create" => Self::Create,
            _ => Self::Remember,
        }
    }
}

/// A study session or an assessment, as read from the Activity Store
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActivityRecord {
    Session(StudySessionRecord),
    Assessment(AssessmentRecord),
}

impl ActivityRecord {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Session(s) => s.created_at,
            Self::Assessment(a) => a.completed_at,
        }
    }

    pub fn xp_earned(&self) -> i64 {
        match self {
            Self::Session(s) => s.xp_earned,
            Self::Assessment(a) => a.xp_earned,
        }
    }

    /// Assessments carry no recorded duration
    pub fn duration_minutes(&self) -> f64 {
        match self {
            Self::Session(s) => s.duration_minutes,
            Self::Assessment(_) => 0.0,
        }
    }

    pub fn is_session(&self) -> bool {
        matches!(self, Self::Session(_))
    }
}

impl From<StudySessionRecord> for ActivityRecord {
    fn from(value: StudySessionRecord) -> Self {
        Self::Session(value)
    }
}

impl From<AssessmentRecord> for ActivityRecord {
    fn from(value: AssessmentRecord) -> Self {
        Self::Assessment(value)
    }
}

/// Pending spaced-repetition review supplied by the revision scheduler
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRevision {
    #[serde(default)]
    pub review_interval_days: f64,
}

// ==================== Classifications ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VelocityTrend {
    Up,
    #[default]
    Stable,
    Down,
}

impl VelocityTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Stable => "stable",
            Self::Down => "down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentumLevel {
    Accelerating,
    Steady,
    Slowing,
    Stalled,
}

impl MomentumLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accelerating => "accelerating",
            Self::Steady => "steady",
            Self::Slowing => "slowing",
            Self::Stalled => "stalled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryTrend {
    Rising,
    #[default]
    Stable,
    Declining,
}

impl MasteryTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Stable => "stable",
            Self::Declining => "declining",
        }
    }
}

impl From<VelocityTrend> for MasteryTrend {
    fn from(trend: VelocityTrend) -> Self {
        match trend {
            VelocityTrend::Up => Self::Rising,
            VelocityTrend::Stable => Self::Stable,
            VelocityTrend::Down => Self::Declining,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

/// Display language; only affects labels, never numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Bn,
}

impl Language {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "bn" | "bangla" | "bengali" => Self::Bn,
            _ => Self::En,
        }
    }
}
