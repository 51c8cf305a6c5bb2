use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scheduling state for one (user, problem) pairing.
///
/// Owned by the persistence layer and passed by value through the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionState {
  /// Interval growth multiplier, kept within 1.3..=2.5
  pub ease_factor: f64,
  /// Days until the next review, at most 180
  pub interval: u32,
  /// Consecutive successful reviews since the last failure
  pub repetitions: u32,
  pub next_review_at: DateTime<Utc>,
  /// None until the first review has been submitted
  pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl RevisionState {
  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review_at <= now
  }

  pub fn has_been_reviewed(&self) -> bool {
    self.last_reviewed_at.is_some()
  }

  /// True once the interval has grown to `threshold_days` or beyond
  pub fn is_mastered(&self, threshold_days: u32) -> bool {
    self.interval >= threshold_days
  }
}

/// How overdue an item is, coarsely bucketed for queue ranking and UI emphasis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
  Critical, // 7+ days overdue
  High,     // 3-6 days overdue
  Medium,   // due, under 3 days overdue
  Low,      // not yet due
}

impl Urgency {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Critical => "critical",
      Self::High => "high",
      Self::Medium => "medium",
      Self::Low => "low",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "critical" => Some(Self::Critical),
      "high" => Some(Self::High),
      "medium" => Some(Self::Medium),
      "low" => Some(Self::Low),
      _ => None,
    }
  }

  /// Ordering key, 0 = most urgent
  pub fn rank(&self) -> u8 {
    match self {
      Self::Critical => 0,
      Self::High => 1,
      Self::Medium => 2,
      Self::Low => 3,
    }
  }

  /// True for every tier except `Low`
  pub fn is_due(&self) -> bool {
    !matches!(self, Self::Low)
  }
}

/// Result of classifying a due date against a reference time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrgencyClassification {
  /// Whole days past due, clamped to zero for items not yet due
  pub days_overdue: u32,
  pub urgency: Urgency,
}
