//! Compile-time conditional profiling.
//!
//! With the `profiling` feature enabled, scheduling and queue operations
//! append JSONL events to `data/profile_<session>.jsonl` (or the directory
//! named by `REVISION_PROFILE_DIR`). Without it, every macro expands to
//! nothing and the functions below are empty.
//!
//! # Usage
//!
//! ```rust,ignore
//! use revision_engine::profile_log;
//! use revision_engine::profiling::EventType;
//!
//! profile_log!(EventType::StatsComputed { scheduled: 12, history: 40 });
//! ```

#[cfg(feature = "profiling")]
mod event;
#[cfg(feature = "profiling")]
mod logger;

#[cfg(feature = "profiling")]
pub use event::*;
#[cfg(feature = "profiling")]
pub use logger::*;

#[cfg(not(feature = "profiling"))]
mod noop;
#[cfg(not(feature = "profiling"))]
pub use noop::*;

/// Log a profiling event. Expands to nothing without the `profiling` feature.
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_log {
    ($event_type:expr) => {
        $crate::profiling::log_event($event_type)
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_log {
    ($($args:tt)*) => {};
}

/// Execute a block and log its duration.
///
/// Without the `profiling` feature this just evaluates the block.
///
/// ```rust,ignore
/// let queue = profile_scope!("build_review_queue", {
///     build_review_queue(&problems, now, &options)
/// });
/// ```
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $body:block) => {{
        let _start = std::time::Instant::now();
        let result = $body;
        $crate::profiling::log_timed($name, _start.elapsed());
        result
    }};
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr, $body:block) => {
        $body
    };
}
