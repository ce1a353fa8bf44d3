//! Activity Store reads: one learner, one time window, no writes.

use chrono::{DateTime, Utc};
use shikkha_forecast::{
    ActivityRecord, AssessmentRecord, BloomLevel, ForecastInput, PendingRevision,
    StudySessionRecord, TopicMasteryRecord,
};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub async fn load_forecast_input(
    pool: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<ForecastInput, sqlx::Error> {
    let (mastery_records, pending_revisions, sessions, assessments, profile) = tokio::try_join!(
        select_topic_mastery(pool, user_id),
        select_pending_revisions(pool, user_id),
        select_study_sessions(pool, user_id, since),
        select_assessments(pool, user_id, since),
        select_profile_counters(pool, user_id),
    )?;

    let mut activity_records: Vec<ActivityRecord> =
        Vec::with_capacity(sessions.len() + assessments.len());
    activity_records.extend(sessions.into_iter().map(ActivityRecord::from));
    activity_records.extend(assessments.into_iter().map(ActivityRecord::from));

    let (current_streak_days, current_total_xp) = profile.unwrap_or_default();

    tracing::debug!(
        %user_id,
        topics = mastery_records.len(),
        pending = pending_revisions.len(),
        activity = activity_records.len(),
        "activity snapshot loaded"
    );

    Ok(ForecastInput {
        mastery_records,
        pending_revisions,
        activity_records,
        current_streak_days,
        current_total_xp,
    })
}

async fn select_topic_mastery(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<TopicMasteryRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            topic_name,
            COALESCE(mastery_score, 0)::float8 AS mastery_score,
            COALESCE(attempts, 0)::int8 AS attempts,
            last_practiced_at,
            COALESCE(is_weak_topic, false) AS is_weak_topic
        FROM topic_mastery
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<TopicMasteryRecord, sqlx::Error> {
            let attempts: i64 = row.try_get("attempts")?;
            Ok(TopicMasteryRecord {
                topic_name: row.try_get("topic_name")?,
                mastery_score: row.try_get("mastery_score")?,
                attempts: u32::try_from(attempts.max(0)).unwrap_or(u32::MAX),
                last_practiced_at: row.try_get("last_practiced_at")?,
                is_weak_topic: row.try_get("is_weak_topic")?,
            })
        })
        .collect()
}

async fn select_pending_revisions(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PendingRevision>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT COALESCE(review_interval_days, 0)::float8 AS review_interval_days
        FROM revision_schedule
        WHERE user_id = $1 AND status = 'pending'
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<PendingRevision, sqlx::Error> {
            Ok(PendingRevision {
                review_interval_days: row.try_get("review_interval_days")?,
            })
        })
        .collect()
}

async fn select_study_sessions(
    pool: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<StudySessionRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            COALESCE(xp_earned, 0)::int8 AS xp_earned,
            COALESCE(duration_minutes, 0)::float8 AS duration_minutes,
            created_at,
            topic
        FROM study_sessions
        WHERE user_id = $1 AND created_at >= $2
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<StudySessionRecord, sqlx::Error> {
            Ok(StudySessionRecord {
                xp_earned: row.try_get("xp_earned")?,
                duration_minutes: row.try_get("duration_minutes")?,
                created_at: row.try_get("created_at")?,
                topic: row.try_get("topic")?,
            })
        })
        .collect()
}

async fn select_assessments(
    pool: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<AssessmentRecord>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT
            COALESCE(xp_earned, 0)::int8 AS xp_earned,
            completed_at,
            bloom_level
        FROM assessments
        WHERE user_id = $1 AND completed_at IS NOT NULL AND completed_at >= $2
        ORDER BY completed_at ASC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<AssessmentRecord, sqlx::Error> {
            let bloom_level: Option<String> = row.try_get("bloom_level")?;
            Ok(AssessmentRecord {
                xp_earned: row.try_get("xp_earned")?,
                completed_at: row.try_get("completed_at")?,
                bloom_level: bloom_level
                    .as_deref()
                    .map(BloomLevel::parse)
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// `(current_streak, total_xp)`, or `None` when the profile row is missing
async fn select_profile_counters(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<(i64, i64)>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT
            COALESCE(current_streak, 0)::int8 AS current_streak,
            COALESCE(total_xp, 0)::int8 AS total_xp
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(|row| -> Result<(i64, i64), sqlx::Error> {
        Ok((row.try_get("current_streak")?, row.try_get("total_xp")?))
    })
    .transpose()
}
