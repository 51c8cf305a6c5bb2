//! Urgency classification and review queue ordering.
//!
//! Items are ranked purely by how far past their due date they are:
//! - 7+ days overdue is critical
//! - 3-6 days overdue is high
//! - due but under 3 days overdue is medium
//! - anything not yet due is low

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::QueueConfig;
use crate::domain::{
  DueProblem, ProblemDifficulty, RevisionState, TrackedProblem, Urgency, UrgencyClassification,
};
#[cfg(feature = "profiling")]
use crate::profiling::EventType;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Days overdue at which an item becomes critical
pub const CRITICAL_DAYS: i64 = 7;

/// Days overdue at which an item becomes high urgency
pub const HIGH_DAYS: i64 = 3;

/// Anything carrying a (possibly absent) next review date
pub trait Schedulable {
  fn next_review_at(&self) -> Option<DateTime<Utc>>;
}

impl Schedulable for RevisionState {
  fn next_review_at(&self) -> Option<DateTime<Utc>> {
    Some(self.next_review_at)
  }
}

impl Schedulable for TrackedProblem {
  fn next_review_at(&self) -> Option<DateTime<Utc>> {
    Some(self.state.next_review_at)
  }
}

impl Schedulable for DueProblem {
  fn next_review_at(&self) -> Option<DateTime<Utc>> {
    Some(self.next_review_at)
  }
}

impl<T: Schedulable> Schedulable for &T {
  fn next_review_at(&self) -> Option<DateTime<Utc>> {
    (*self).next_review_at()
  }
}

/// Whole days between `next_review_at` and `now`, floored (negative when not yet due)
fn day_difference(next_review_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
  (now - next_review_at).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// Classify how overdue a review is at `now`.
///
/// Tiers use the unclamped day difference; the reported `days_overdue` is
/// clamped to zero for items that are not yet due.
pub fn classify_urgency(
  next_review_at: DateTime<Utc>,
  now: DateTime<Utc>,
) -> UrgencyClassification {
  let days = day_difference(next_review_at, now);

  let urgency = if days >= CRITICAL_DAYS {
    Urgency::Critical
  } else if days >= HIGH_DAYS {
    Urgency::High
  } else if days >= 0 {
    Urgency::Medium
  } else {
    Urgency::Low
  };

  UrgencyClassification {
    days_overdue: u32::try_from(days.max(0)).unwrap_or(u32::MAX),
    urgency,
  }
}

/// Stable ascending sort by next review date, most overdue first.
///
/// Returns a new vector; items without a date go last.
pub fn sort_by_urgency<T: Schedulable + Clone>(items: &[T]) -> Vec<T> {
  let mut sorted = items.to_vec();
  sorted.sort_by_key(|item| {
    let due = item.next_review_at();
    (due.is_none(), due)
  });
  sorted
}

/// Items whose next review date is present and not after `now`, in input order
pub fn filter_due<T: Schedulable + Clone>(items: &[T], now: DateTime<Utc>) -> Vec<T> {
  items
    .iter()
    .filter(|item| item.next_review_at().is_some_and(|due| due <= now))
    .cloned()
    .collect()
}

/// Parameters for [`build_review_queue`]
#[derive(Debug, Clone, PartialEq)]
pub struct QueueOptions {
  /// Maximum rows considered, applied after ordering
  pub limit: usize,
  /// Also return problems that are not yet due
  pub include_upcoming: bool,
  pub topic: Option<String>,
  pub difficulty: Option<ProblemDifficulty>,
}

impl Default for QueueOptions {
  fn default() -> Self {
    Self::from(&QueueConfig::default())
  }
}

impl From<&QueueConfig> for QueueOptions {
  fn from(config: &QueueConfig) -> Self {
    Self {
      limit: config.limit,
      include_upcoming: config.include_upcoming,
      topic: None,
      difficulty: None,
    }
  }
}

/// Per-tier counts for the due half of a queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSummary {
  pub total_due: usize,
  pub critical: usize,
  pub high: usize,
  pub medium: usize,
  pub upcoming_count: usize,
}

/// A user's review queue at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewQueue {
  /// Due and overdue problems, most overdue first
  pub due: Vec<DueProblem>,
  /// Problems not yet due; only present when upcoming items were requested
  #[serde(skip_serializing_if = "Option::is_none")]
  pub upcoming: Option<Vec<DueProblem>>,
  pub summary: QueueSummary,
}

/// Build the review queue for `problems` as seen at `now`.
pub fn build_review_queue(
  problems: &[TrackedProblem],
  now: DateTime<Utc>,
  options: &QueueOptions,
) -> ReviewQueue {
  let candidates: Vec<&TrackedProblem> = problems
    .iter()
    .filter(|p| options.include_upcoming || p.state.is_due(now))
    .filter(|p| options.topic.as_deref().is_none_or(|topic| p.has_topic(topic)))
    .filter(|p| options.difficulty.is_none_or(|d| p.difficulty == d))
    .collect();

  let rows: Vec<DueProblem> = sort_by_urgency(&candidates)
    .into_iter()
    .take(options.limit)
    .map(|p| DueProblem::new(p, classify_urgency(p.state.next_review_at, now)))
    .collect();

  let (due, upcoming): (Vec<DueProblem>, Vec<DueProblem>) =
    rows.into_iter().partition(|row| row.urgency.is_due());

  let count = |tier: Urgency| due.iter().filter(|row| row.urgency == tier).count();
  let summary = QueueSummary {
    total_due: due.len(),
    critical: count(Urgency::Critical),
    high: count(Urgency::High),
    medium: count(Urgency::Medium),
    upcoming_count: upcoming.len(),
  };

  tracing::debug!(
    considered = candidates.len(),
    due = summary.total_due,
    upcoming = summary.upcoming_count,
    "built review queue"
  );

  crate::profile_log!(EventType::QueueBuilt {
    considered: candidates.len(),
    due: summary.total_due,
    upcoming: summary.upcoming_count,
  });

  ReviewQueue {
    due: sort_by_urgency(&due),
    upcoming: options.include_upcoming.then_some(upcoming),
    summary,
  }
}
