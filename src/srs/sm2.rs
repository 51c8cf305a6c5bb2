use chrono::{DateTime, Duration, Utc};

use crate::config::Sm2Config;
use crate::domain::{ReviewInput, ReviewOutcome, ReviewStatus, RevisionState};
#[cfg(feature = "profiling")]
use crate::profiling::EventType;

const MAX_QUALITY: u8 = 5;

/// Round to two decimal places (half away from zero) so persisted ease
/// factors are reproducible.
pub(crate) fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// SM-2 scheduler parameterised by [`Sm2Config`].
///
/// Every method is a pure function of its arguments; the current time is
/// always passed in.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
  config: Sm2Config,
}

impl Scheduler {
  pub fn new(config: Sm2Config) -> Self {
    Self { config }
  }

  /// State for a problem that has just been marked as learned
  pub fn initial_state(&self, now: DateTime<Utc>) -> RevisionState {
    RevisionState {
      ease_factor: self.config.default_ease_factor,
      interval: self.config.initial_interval,
      repetitions: 0,
      next_review_at: now + Duration::days(i64::from(self.config.initial_interval)),
      last_reviewed_at: None,
    }
  }

  /// EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)), clamped to the
  /// configured bounds and rounded to two decimals.
  pub fn ease_factor(&self, current_ease: f64, quality: u8) -> f64 {
    let q = f64::from(quality.min(MAX_QUALITY));
    let delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
    let clamped = (current_ease + delta)
      .clamp(self.config.min_ease_factor, self.config.max_ease_factor);
    round2(clamped)
  }

  /// Next interval in days.
  ///
  /// `repetitions` is the count *before* this review. A failed review is a
  /// hard reset to the initial interval.
  pub fn interval(
    &self,
    repetitions: u32,
    ease_factor: f64,
    current_interval: u32,
    quality: u8,
  ) -> u32 {
    let interval = if quality < self.config.passing_quality {
      self.config.initial_interval
    } else {
      match repetitions {
        0 => self.config.initial_interval,
        1 => self.config.second_interval,
        // `as` saturates, the cap below brings it back into range
        _ => (f64::from(current_interval) * ease_factor).round() as u32,
      }
    };
    interval.min(self.config.max_interval)
  }

  /// Advance `current` by one graded review at time `now`.
  pub fn process_review(
    &self,
    current: &RevisionState,
    input: &ReviewInput,
    now: DateTime<Utc>,
  ) -> ReviewOutcome {
    let was_successful = input.passes(&self.config);

    let ease_factor = self.ease_factor(current.ease_factor, input.quality);
    let repetitions = if was_successful {
      current.repetitions.saturating_add(1)
    } else {
      0
    };
    // New ease, but the old repetition count and interval
    let interval = self.interval(current.repetitions, ease_factor, current.interval, input.quality);

    let new_state = RevisionState {
      ease_factor,
      interval,
      repetitions,
      next_review_at: now + Duration::days(i64::from(interval)),
      last_reviewed_at: Some(now),
    };

    let interval_change = i64::from(interval) - i64::from(current.interval);

    let (status, message) = if !was_successful {
      (ReviewStatus::Failure, "Review failed. Resetting to initial interval.".to_string())
    } else if interval_change > 0 {
      (ReviewStatus::Success, format!("Great! Next review in {} days.", interval))
    } else {
      (ReviewStatus::Success, format!("Keep practicing! Next review in {} days.", interval))
    };

    tracing::debug!(
      quality = input.quality,
      ease_factor,
      interval,
      repetitions,
      interval_change,
      "processed review"
    );

    crate::profile_log!(EventType::ReviewProcessed {
      quality: input.quality,
      was_successful,
      interval_change,
    });

    ReviewOutcome {
      new_state,
      was_successful,
      interval_change,
      status,
      message,
    }
  }
}

/// Initial state using the canonical SM-2 bounds
pub fn create_initial_state(now: DateTime<Utc>) -> RevisionState {
  Scheduler::default().initial_state(now)
}

/// Ease factor update using the canonical SM-2 bounds (1.3..=2.5)
pub fn compute_ease_factor(current_ease: f64, quality: u8) -> f64 {
  Scheduler::default().ease_factor(current_ease, quality)
}

/// Interval update using the canonical intervals (1, 6) and 180-day cap
pub fn compute_interval(
  repetitions: u32,
  ease_factor: f64,
  current_interval: u32,
  quality: u8,
) -> u32 {
  Scheduler::default().interval(repetitions, ease_factor, current_interval, quality)
}

/// Process a review using the canonical SM-2 configuration
pub fn process_review(
  current: &RevisionState,
  input: &ReviewInput,
  now: DateTime<Utc>,
) -> ReviewOutcome {
  Scheduler::default().process_review(current, input, now)
}

/// Human-readable interval ("Tomorrow", "2 week(s)", ...)
pub fn format_interval(days: u32) -> String {
  match days {
    0 => "Today".to_string(),
    1 => "Tomorrow".to_string(),
    2..=6 => format!("{} days", days),
    7..=29 => format!("{} week(s)", days / 7),
    30..=364 => format!("{} month(s)", days / 30),
    _ => format!("{} year(s)", days / 365),
  }
}
