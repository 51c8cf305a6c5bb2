//! Event types for profiling.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A profiling event with timestamp and optional duration.
#[derive(Serialize)]
pub struct ProfileEvent {
    /// Wall-clock time the event was logged (never fed back into scheduling)
    pub timestamp: DateTime<Utc>,
    /// The type of event
    pub event_type: EventType,
    /// Duration in microseconds (for timed events)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
}

impl ProfileEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            duration_us: None,
        }
    }

    pub fn with_duration(event_type: EventType, duration: std::time::Duration) -> Self {
        Self {
            duration_us: Some(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)),
            ..Self::new(event_type)
        }
    }
}

/// Types of events that can be logged.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventType {
    // === Session lifecycle ===
    SessionStart {
        session_id: String,
    },
    SessionEnd {
        total_events: u64,
    },

    // === Scheduling ===
    /// One review was folded into a revision state
    ReviewProcessed {
        quality: u8,
        was_successful: bool,
        /// New interval minus previous interval, in days
        interval_change: i64,
    },

    // === Read path ===
    /// A review queue was assembled
    QueueBuilt {
        /// Problems left after due/topic/difficulty filtering
        considered: usize,
        due: usize,
        upcoming: usize,
    },
    /// Aggregate statistics were computed
    StatsComputed {
        scheduled: usize,
        history: usize,
    },

    // === Timed scope ===
    TimedScope {
        name: String,
    },
}
