//! Test utilities for deterministic scheduling.
//!
//! Every engine operation takes an explicit `now`, so tests anchor all
//! timestamps to a fixed epoch instead of reading the wall clock.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{ProblemDifficulty, RevisionState, TrackedProblem};

/// 2024-01-01T09:00:00Z, the "Day 0" used throughout the tests.
pub const EPOCH_SECS: i64 = 1_704_099_600;

/// Day `n` relative to the test epoch (negative values go back in time).
pub fn day(n: i64) -> DateTime<Utc> {
    epoch() + Duration::days(n)
}

/// Day `n` plus a number of hours, for sub-day boundary tests.
pub fn day_hours(n: i64, hours: i64) -> DateTime<Utc> {
    day(n) + Duration::hours(hours)
}

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(EPOCH_SECS, 0).expect("test epoch is a valid timestamp")
}

/// A reviewed state due on `due_day`.
pub fn state(ease_factor: f64, interval: u32, repetitions: u32, due_day: i64) -> RevisionState {
    RevisionState {
        ease_factor,
        interval,
        repetitions,
        next_review_at: day(due_day),
        last_reviewed_at: Some(day(due_day - i64::from(interval))),
    }
}

/// A tracked problem wrapping `state`, with predictable metadata.
pub fn tracked(
    id: &str,
    topic: &str,
    difficulty: ProblemDifficulty,
    state: RevisionState,
) -> TrackedProblem {
    TrackedProblem {
        id: id.to_string(),
        user_problem_id: format!("up-{}", id),
        title: format!("Problem {}", id),
        difficulty,
        topics: vec![topic.to_string()],
        platform: "leetcode".to_string(),
        state,
    }
}
