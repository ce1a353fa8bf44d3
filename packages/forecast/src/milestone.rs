//! XP milestone table and next-milestone lookup.

use serde::Serialize;

use crate::sanitize::{non_negative, non_negative_xp};
use crate::types::Language;

/// Fallback horizon when the learner has no recent xp
pub const NO_PROGRESS_DAYS_AWAY: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub xp_threshold: i64,
    pub name: &'static str,
    pub name_bn: &'static str,
}

impl Milestone {
    pub fn title(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.name,
            Language::Bn => self.name_bn,
        }
    }
}

/// Ascending by threshold
pub const MILESTONES: &[Milestone] = &[
    Milestone { xp_threshold: 100, name: "First Steps", name_bn: "প্রথম পদক্ষেপ" },
    Milestone { xp_threshold: 500, name: "Curious Learner", name_bn: "কৌতূহলী শিক্ষার্থী" },
    Milestone { xp_threshold: 1_000, name: "Dedicated Student", name_bn: "নিবেদিত শিক্ষার্থী" },
    Milestone { xp_threshold: 2_500, name: "Knowledge Seeker", name_bn: "জ্ঞান অন্বেষী" },
    Milestone { xp_threshold: 5_000, name: "Scholar", name_bn: "বিদ্বান" },
    Milestone { xp_threshold: 10_000, name: "Master Scholar", name_bn: "মহাবিদ্বান" },
    Milestone { xp_threshold: 25_000, name: "Legend", name_bn: "কিংবদন্তি" },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMilestone {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub remaining_xp: i64,
    pub days_away: i64,
}

/// First milestone whose threshold exceeds `total_xp`, or the last one.
pub fn find_next(total_xp: i64) -> Milestone {
    let total = non_negative_xp(total_xp);
    MILESTONES
        .iter()
        .find(|m| m.xp_threshold > total)
        .or_else(|| MILESTONES.last())
        .copied()
        .unwrap_or(Milestone { xp_threshold: 0, name: "", name_bn: "" })
}

pub fn next_milestone(total_xp: i64, avg_daily_xp: f64) -> NextMilestone {
    let milestone = find_next(total_xp);
    let remaining_xp = (milestone.xp_threshold - non_negative_xp(total_xp)).max(0);
    let avg = non_negative(avg_daily_xp);

    let days_away = if remaining_xp == 0 {
        0
    } else if avg <= 0.0 {
        NO_PROGRESS_DAYS_AWAY
    } else {
        (remaining_xp as f64 / avg).ceil() as i64
    };

    NextMilestone {
        milestone,
        remaining_xp,
        days_away,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ascending() {
        assert!(MILESTONES
            .windows(2)
            .all(|pair| pair[0].xp_threshold < pair[1].xp_threshold));
    }

    #[test]
    fn test_first_threshold_exceeding_total() {
        assert_eq!(find_next(0).xp_threshold, 100);
        assert_eq!(find_next(100).xp_threshold, 500);
        assert_eq!(find_next(4_999).xp_threshold, 5_000);
    }

    #[test]
    fn test_beyond_table_returns_last() {
        let next = next_milestone(1_000_000, 50.0);
        assert_eq!(next.milestone, *MILESTONES.last().unwrap());
        assert_eq!(next.remaining_xp, 0);
        assert_eq!(next.days_away, 0);
    }

    #[test]
    fn test_days_away() {
        let next = next_milestone(400, 30.0);
        assert_eq!(next.remaining_xp, 100);
        assert_eq!(next.days_away, 4);
    }

    #[test]
    fn test_no_progress_fallback() {
        let next = next_milestone(400, 0.0);
        assert_eq!(next.days_away, NO_PROGRESS_DAYS_AWAY);
    }

    #[test]
    fn test_bangla_title() {
        assert_eq!(MILESTONES[4].title(Language::Bn), "বিদ্বান");
        assert_eq!(MILESTONES[4].title(Language::En), "Scholar");
    }
}
