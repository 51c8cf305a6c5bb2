pub mod problem;
pub mod review;
pub mod revision;

pub use problem::{DueProblem, ProblemDifficulty, TrackedProblem};
pub use review::{
  QualityRating, ReviewInput, ReviewOutcome, ReviewRecord, ReviewStatus, UserDifficulty,
  PASSING_QUALITY,
};
pub use revision::{RevisionState, Urgency, UrgencyClassification};
