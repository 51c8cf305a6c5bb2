pub mod sm2;
pub mod stats;
pub mod urgency;

pub use sm2::{
  compute_ease_factor, compute_interval, create_initial_state, format_interval, process_review,
  Scheduler,
};
pub use stats::{compute_stats, compute_stats_with_config, ReviewSuccess, RevisionStats};
pub use urgency::{
  build_review_queue, classify_urgency, filter_due, sort_by_urgency, QueueOptions, QueueSummary,
  ReviewQueue, Schedulable,
};
