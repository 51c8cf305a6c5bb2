use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::revision::{RevisionState, Urgency, UrgencyClassification};

/// Platform-assigned difficulty of a problem (not the user's own rating)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemDifficulty {
  Easy,
  Medium,
  Hard,
}

impl ProblemDifficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }

  /// Case-insensitive, so query strings like "HARD" or "Hard" both resolve
  pub fn from_str(s: &str) -> Option<Self> {
    match s.to_ascii_lowercase().as_str() {
      "easy" => Some(Self::Easy),
      "medium" => Some(Self::Medium),
      "hard" => Some(Self::Hard),
      _ => None,
    }
  }
}

/// A solved problem the user is tracking, together with its scheduling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedProblem {
  pub id: String,
  pub user_problem_id: String,
  pub title: String,
  pub difficulty: ProblemDifficulty,
  #[serde(default)]
  pub topics: Vec<String>,
  pub platform: String,
  pub state: RevisionState,
}

impl TrackedProblem {
  pub fn has_topic(&self, topic: &str) -> bool {
    self.topics.iter().any(|t| t.eq_ignore_ascii_case(topic))
  }
}

/// One row of a review queue: problem metadata plus its urgency at query time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueProblem {
  pub id: String,
  pub user_problem_id: String,
  pub title: String,
  pub difficulty: ProblemDifficulty,
  pub topics: Vec<String>,
  pub platform: String,

  pub ease_factor: f64,
  pub interval: u32,
  pub repetitions: u32,
  pub next_review_at: DateTime<Utc>,
  pub last_reviewed_at: Option<DateTime<Utc>>,

  pub days_overdue: u32,
  pub urgency: Urgency,
}

impl DueProblem {
  pub fn new(problem: &TrackedProblem, classification: UrgencyClassification) -> Self {
    Self {
      id: problem.id.clone(),
      user_problem_id: problem.user_problem_id.clone(),
      title: problem.title.clone(),
      difficulty: problem.difficulty,
      topics: problem.topics.clone(),
      platform: problem.platform.clone(),
      ease_factor: problem.state.ease_factor,
      interval: problem.state.interval,
      repetitions: problem.state.repetitions,
      next_review_at: problem.state.next_review_at,
      last_reviewed_at: problem.state.last_reviewed_at,
      days_overdue: classification.days_overdue,
      urgency: classification.urgency,
    }
  }
}
