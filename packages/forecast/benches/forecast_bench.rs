//! Benchmark suite for shikkha-forecast
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use shikkha_forecast::{
    compute_forecast, compute_forecasts, ActivityRecord, AssessmentRecord, BloomLevel,
    ForecastInput, ForecastOptions, PendingRevision, StudySessionRecord, TopicMasteryRecord,
};

fn random_input(rng: &mut StdRng, records: usize) -> ForecastInput {
    let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
    let activity_records = (0..records)
        .map(|_| {
            let at = now - Duration::minutes(rng.gen_range(0..14 * 24 * 60));
            if rng.gen_bool(0.7) {
                ActivityRecord::Session(StudySessionRecord {
                    xp_earned: rng.gen_range(0..120),
                    duration_minutes: rng.gen_range(5.0..90.0),
                    created_at: at,
                    topic: None,
                })
            } else {
                ActivityRecord::Assessment(AssessmentRecord {
                    xp_earned: rng.gen_range(0..60),
                    completed_at: at,
                    bloom_level: BloomLevel::Understand,
                })
            }
        })
        .collect();

    ForecastInput {
        mastery_records: (0..20)
            .map(|i| TopicMasteryRecord {
                topic_name: format!("topic-{i}"),
                mastery_score: rng.gen_range(0.0..100.0),
                attempts: rng.gen_range(0..40),
                last_practiced_at: None,
                is_weak_topic: rng.gen_bool(0.3),
            })
            .collect(),
        pending_revisions: (0..8)
            .map(|_| PendingRevision { review_interval_days: rng.gen_range(1.0..30.0) })
            .collect(),
        activity_records,
        current_streak_days: rng.gen_range(0..30),
        current_total_xp: rng.gen_range(0..20_000),
    }
}

fn bench_compute_forecast(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let input = random_input(&mut rng, 200);
    let options = ForecastOptions::at(Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap());

    c.bench_function("compute_forecast/200_records", |b| {
        b.iter(|| compute_forecast(&input, &options))
    });
}

fn bench_compute_forecasts_batch(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(11);
    let inputs: Vec<ForecastInput> = (0..256).map(|_| random_input(&mut rng, 100)).collect();
    let options = ForecastOptions::at(Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap());

    c.bench_function("compute_forecasts/256_learners", |b| {
        b.iter(|| compute_forecasts(&inputs, &options))
    });
}

criterion_group!(benches, bench_compute_forecast, bench_compute_forecasts_batch);
criterion_main!(benches);
