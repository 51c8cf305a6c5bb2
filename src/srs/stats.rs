//! Aggregate revision statistics over a user's tracked problems.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::sm2::round2;
use crate::config::Sm2Config;
use crate::domain::{ReviewOutcome, ReviewRecord, RevisionState};
#[cfg(feature = "profiling")]
use crate::profiling::EventType;

/// Anything that records whether a past review succeeded
pub trait ReviewSuccess {
  fn was_successful(&self) -> bool;
}

impl ReviewSuccess for bool {
  fn was_successful(&self) -> bool {
    *self
  }
}

impl ReviewSuccess for ReviewOutcome {
  fn was_successful(&self) -> bool {
    self.was_successful
  }
}

impl ReviewSuccess for ReviewRecord {
  fn was_successful(&self) -> bool {
    self.was_successful
  }
}

impl<T: ReviewSuccess> ReviewSuccess for &T {
  fn was_successful(&self) -> bool {
    (*self).was_successful()
  }
}

/// Dashboard statistics for a collection of revision states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionStats {
  pub total_scheduled: usize,
  /// Due before the start of today
  pub overdue: usize,
  /// Due at some point today
  pub due_today: usize,
  /// Due on or before the start of the 7th day from today, overdue included
  pub upcoming_7_days: usize,
  pub avg_ease_factor: f64,
  pub avg_interval: u32,
  pub mastered_count: usize,
  /// Percentage of successful reviews, 0-100
  pub retention_rate: u32,
}

/// Midnight UTC of the day containing `now`
fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
  now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Compute statistics using the canonical SM-2 defaults.
pub fn compute_stats<H: ReviewSuccess>(
  states: &[RevisionState],
  history: &[H],
  now: DateTime<Utc>,
) -> RevisionStats {
  compute_stats_with_config(states, history, now, &Sm2Config::default())
}

/// Compute statistics; `config` supplies the mastery threshold and the
/// average ease reported for an empty collection.
pub fn compute_stats_with_config<H: ReviewSuccess>(
  states: &[RevisionState],
  history: &[H],
  now: DateTime<Utc>,
  config: &Sm2Config,
) -> RevisionStats {
  let today = start_of_day(now);
  let tomorrow = today + Duration::days(1);
  let in_7_days = today + Duration::days(7);

  let mut overdue = 0;
  let mut due_today = 0;
  let mut upcoming_7_days = 0;
  let mut mastered_count = 0;
  let mut total_ease = 0.0;
  let mut total_interval: u64 = 0;

  for state in states {
    let due = state.next_review_at;

    if due < today {
      overdue += 1;
    } else if due < tomorrow {
      due_today += 1;
    }

    if due <= in_7_days {
      upcoming_7_days += 1;
    }

    if state.is_mastered(config.mastered_interval) {
      mastered_count += 1;
    }

    total_ease += state.ease_factor;
    total_interval += u64::from(state.interval);
  }

  let (avg_ease_factor, avg_interval) = if states.is_empty() {
    (config.default_ease_factor, 0)
  } else {
    let count = states.len() as f64;
    (round2(total_ease / count), (total_interval as f64 / count).round() as u32)
  };

  let successes = history.iter().filter(|h| h.was_successful()).count();
  let retention_rate = if history.is_empty() {
    0
  } else {
    (successes as f64 / history.len() as f64 * 100.0).round() as u32
  };

  crate::profile_log!(EventType::StatsComputed {
    scheduled: states.len(),
    history: history.len(),
  });

  RevisionStats {
    total_scheduled: states.len(),
    overdue,
    due_today,
    upcoming_7_days,
    avg_ease_factor,
    avg_interval,
    mastered_count,
    retention_rate,
  }
}
