use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::revision::RevisionState;
use crate::config::Sm2Config;
use crate::error::{EngineError, Result};

/// Lowest quality that still counts as a successful recall
pub const PASSING_QUALITY: u8 = 3;

/// The six SM-2 recall grades
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRating {
  Blackout = 0, // No memory at all
  Forgot = 1,   // Vague memory only
  Hard = 2,     // Wrong, but remembered when shown
  Okay = 3,     // Correct but struggled
  Good = 4,     // Correct with slight hesitation
  Perfect = 5,  // Instant recall
}

impl QualityRating {
  pub fn from_u8(value: u8) -> Option<Self> {
    match value {
      0 => Some(Self::Blackout),
      1 => Some(Self::Forgot),
      2 => Some(Self::Hard),
      3 => Some(Self::Okay),
      4 => Some(Self::Good),
      5 => Some(Self::Perfect),
      _ => None,
    }
  }

  pub fn value(&self) -> u8 {
    *self as u8
  }

  pub fn is_successful(&self) -> bool {
    self.value() >= PASSING_QUALITY
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Blackout => "Blackout",
      Self::Forgot => "Forgot",
      Self::Hard => "Hard",
      Self::Okay => "Okay",
      Self::Good => "Good",
      Self::Perfect => "Perfect",
    }
  }

  pub fn description(&self) -> &'static str {
    match self {
      Self::Blackout => "No memory at all",
      Self::Forgot => "Vague memory only",
      Self::Hard => "Wrong, but remembered when shown",
      Self::Okay => "Correct but struggled",
      Self::Good => "Correct with slight hesitation",
      Self::Perfect => "Instant recall, no hesitation",
    }
  }
}

impl TryFrom<i64> for QualityRating {
  type Error = EngineError;

  fn try_from(value: i64) -> Result<Self> {
    u8::try_from(value)
      .ok()
      .and_then(Self::from_u8)
      .ok_or(EngineError::InvalidQuality(value))
  }
}

/// How hard re-solving a problem felt, as reported by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserDifficulty {
  Trivial,
  Easy,
  Medium,
  Hard,
  Impossible,
}

impl UserDifficulty {
  /// Monotonic mapping onto the SM-2 scale; only `Hard` and `Impossible` fail
  pub fn to_quality(&self) -> QualityRating {
    match self {
      Self::Trivial => QualityRating::Perfect,
      Self::Easy => QualityRating::Good,
      Self::Medium => QualityRating::Okay,
      Self::Hard => QualityRating::Hard,
      Self::Impossible => QualityRating::Forgot,
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "trivial" => Some(Self::Trivial),
      "easy" => Some(Self::Easy),
      "medium" => Some(Self::Medium),
      "hard" => Some(Self::Hard),
      "impossible" => Some(Self::Impossible),
      _ => None,
    }
  }
}

/// A single review submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewInput {
  /// 0-5; callers validate before reaching the engine
  pub quality: u8,
  /// Seconds taken to recall. Accepted and recorded, but does not affect scheduling.
  #[serde(default)]
  pub response_time: Option<f64>,
}

impl ReviewInput {
  pub fn new(quality: QualityRating) -> Self {
    Self {
      quality: quality.value(),
      response_time: None,
    }
  }

  /// Validate raw caller input, rejecting out-of-range quality and
  /// non-positive response times.
  pub fn validated(quality: i64, response_time: Option<f64>) -> Result<Self> {
    let rating = QualityRating::try_from(quality)?;
    if let Some(seconds) = response_time {
      if !seconds.is_finite() || seconds <= 0.0 {
        return Err(EngineError::InvalidResponseTime(seconds));
      }
    }
    Ok(Self {
      quality: rating.value(),
      response_time,
    })
  }

  pub fn with_response_time(mut self, seconds: f64) -> Self {
    self.response_time = Some(seconds);
    self
  }

  /// Whether this review counts as a recall under `config`'s passing threshold
  pub fn passes(&self, config: &Sm2Config) -> bool {
    self.quality >= config.passing_quality
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
  Success,
  Failure,
}

impl ReviewStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Success => "success",
      Self::Failure => "failure",
    }
  }
}

/// Everything produced by processing one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewOutcome {
  pub new_state: RevisionState,
  pub was_successful: bool,
  /// New interval minus previous interval, in days
  pub interval_change: i64,
  pub status: ReviewStatus,
  pub message: String,
}

/// History entry persisted alongside each processed review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
  pub quality: u8,
  #[serde(default)]
  pub response_time: Option<f64>,
  pub prev_ease_factor: f64,
  pub prev_interval: u32,
  pub prev_repetitions: u32,
  pub new_ease_factor: f64,
  pub new_interval: u32,
  pub new_repetitions: u32,
  pub was_successful: bool,
  pub reviewed_at: DateTime<Utc>,
}

impl ReviewRecord {
  pub fn new(
    previous: &RevisionState,
    input: &ReviewInput,
    outcome: &ReviewOutcome,
    reviewed_at: DateTime<Utc>,
  ) -> Self {
    Self {
      quality: input.quality,
      response_time: input.response_time,
      prev_ease_factor: previous.ease_factor,
      prev_interval: previous.interval,
      prev_repetitions: previous.repetitions,
      new_ease_factor: outcome.new_state.ease_factor,
      new_interval: outcome.new_state.interval,
      new_repetitions: outcome.new_state.repetitions,
      was_successful: outcome.was_successful,
      reviewed_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{day, state};

  // QualityRating tests

  #[test]
  fn test_quality_from_u8() {
    assert_eq!(QualityRating::from_u8(0), Some(QualityRating::Blackout));
    assert_eq!(QualityRating::from_u8(3), Some(QualityRating::Okay));
    assert_eq!(QualityRating::from_u8(5), Some(QualityRating::Perfect));
    assert_eq!(QualityRating::from_u8(6), None);
    assert_eq!(QualityRating::from_u8(255), None);
  }

  #[test]
  fn test_quality_try_from_rejects_out_of_range() {
    assert!(matches!(QualityRating::try_from(-1_i64), Err(EngineError::InvalidQuality(-1))));
    assert!(matches!(QualityRating::try_from(6_i64), Err(EngineError::InvalidQuality(6))));
    assert!(matches!(QualityRating::try_from(300_i64), Err(EngineError::InvalidQuality(300))));
    assert_eq!(QualityRating::try_from(4_i64).unwrap(), QualityRating::Good);
  }

  #[test]
  fn test_quality_success_threshold() {
    assert!(!QualityRating::Blackout.is_successful());
    assert!(!QualityRating::Forgot.is_successful());
    assert!(!QualityRating::Hard.is_successful());
    assert!(QualityRating::Okay.is_successful());
    assert!(QualityRating::Good.is_successful());
    assert!(QualityRating::Perfect.is_successful());
  }

  #[test]
  fn test_quality_labels() {
    assert_eq!(QualityRating::Perfect.label(), "Perfect");
    assert_eq!(QualityRating::Hard.description(), "Wrong, but remembered when shown");
  }

  // UserDifficulty tests

  #[test]
  fn test_user_difficulty_mapping_is_monotonic() {
    let ordered = [
      UserDifficulty::Impossible,
      UserDifficulty::Hard,
      UserDifficulty::Medium,
      UserDifficulty::Easy,
      UserDifficulty::Trivial,
    ];
    let qualities: Vec<u8> = ordered.iter().map(|d| d.to_quality().value()).collect();
    assert_eq!(qualities, vec![1, 2, 3, 4, 5]);
  }

  #[test]
  fn test_user_difficulty_from_str() {
    assert_eq!(UserDifficulty::from_str("TRIVIAL"), Some(UserDifficulty::Trivial));
    assert_eq!(UserDifficulty::from_str("medium"), Some(UserDifficulty::Medium));
    assert_eq!(UserDifficulty::from_str("nope"), None);
  }

  // ReviewInput tests

  #[test]
  fn test_validated_accepts_full_range() {
    for q in 0..=5 {
      let input = ReviewInput::validated(q, None).unwrap();
      assert_eq!(i64::from(input.quality), q);
    }
  }

  #[test]
  fn test_validated_rejects_bad_quality() {
    assert!(matches!(ReviewInput::validated(7, None), Err(EngineError::InvalidQuality(7))));
    assert!(matches!(ReviewInput::validated(-3, None), Err(EngineError::InvalidQuality(-3))));
  }

  #[test]
  fn test_validated_rejects_bad_response_time() {
    assert!(matches!(
      ReviewInput::validated(4, Some(0.0)),
      Err(EngineError::InvalidResponseTime(_))
    ));
    assert!(matches!(
      ReviewInput::validated(4, Some(-2.5)),
      Err(EngineError::InvalidResponseTime(_))
    ));
    assert!(ReviewInput::validated(4, Some(f64::NAN)).is_err());
    assert_eq!(ReviewInput::validated(4, Some(42.0)).unwrap().response_time, Some(42.0));
  }

  #[test]
  fn test_input_builder() {
    let input = ReviewInput::new(QualityRating::Good).with_response_time(30.0);
    assert_eq!(input.quality, 4);
    assert_eq!(input.response_time, Some(30.0));
    assert!(input.passes(&Sm2Config::default()));
  }

  #[test]
  fn test_passes_follows_configured_threshold() {
    let okay = ReviewInput::new(QualityRating::Okay);
    let strict = Sm2Config {
      passing_quality: 4,
      ..Sm2Config::default()
    };
    assert!(okay.passes(&Sm2Config::default()));
    assert!(!okay.passes(&strict));
    assert!(ReviewInput::new(QualityRating::Good).passes(&strict));
  }

  // ReviewRecord tests

  #[test]
  fn test_record_captures_before_and_after() {
    let previous = state(2.3, 90, 8, 0);
    let mut next = state(1.76, 1, 0, 1);
    next.last_reviewed_at = Some(day(0));
    let outcome = ReviewOutcome {
      new_state: next,
      was_successful: false,
      interval_change: -89,
      status: ReviewStatus::Failure,
      message: "Review failed. Resetting to initial interval.".to_string(),
    };
    let input = ReviewInput::validated(1, Some(120.0)).unwrap();

    let record = ReviewRecord::new(&previous, &input, &outcome, day(0));

    assert_eq!(record.quality, 1);
    assert_eq!(record.response_time, Some(120.0));
    assert_eq!(record.prev_interval, 90);
    assert_eq!(record.prev_repetitions, 8);
    assert_eq!(record.new_interval, 1);
    assert_eq!(record.new_repetitions, 0);
    assert!(!record.was_successful);
    assert_eq!(record.reviewed_at, day(0));
  }

  #[test]
  fn test_review_status_serde() {
    assert_eq!(serde_json::to_string(&ReviewStatus::Success).unwrap(), "\"success\"");
    assert_eq!(ReviewStatus::Failure.as_str(), "failure");
  }
}
