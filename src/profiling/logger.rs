//! JSONL file logger for profiling events.

use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

use super::event::{EventType, ProfileEvent};

/// Directory for profile files, overridable through the environment.
pub const ENV_PROFILE_DIR: &str = "REVISION_PROFILE_DIR";

const DEFAULT_PROFILE_DIR: &str = "data";

/// Flush the buffered writer every this many events
const FLUSH_EVERY: u64 = 100;

/// Global logger instance, populated by `init()`.
static LOGGER: Mutex<Option<ProfileLogger>> = Mutex::new(None);

static EVENT_COUNT: AtomicU64 = AtomicU64::new(0);

struct ProfileLogger {
    writer: BufWriter<File>,
    session_id: String,
}

impl ProfileLogger {
    fn new() -> std::io::Result<Self> {
        let session_id = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let dir = std::env::var(ENV_PROFILE_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROFILE_DIR));
        create_dir_all(&dir)?;

        let path = dir.join(format!("profile_{}.jsonl", session_id));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing::info!("Profiling enabled: writing to {}", path.display());

        Ok(Self {
            writer: BufWriter::new(file),
            session_id,
        })
    }

    fn log(&mut self, event: ProfileEvent) {
        match serde_json::to_string(&event) {
            Ok(json) => {
                let _ = writeln!(self.writer, "{}", json);
                let count = EVENT_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
                if count % FLUSH_EVERY == 0 {
                    let _ = self.writer.flush();
                }
                tracing::trace!(target: "profile", "{}", json);
            }
            Err(e) => tracing::warn!("Failed to serialize profile event: {}", e),
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

fn with_logger(event: ProfileEvent) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_mut() {
            logger.log(event);
        }
    }
}

/// Initialize the profiler. Call from main() before any logging.
pub fn init() {
    let Ok(mut guard) = LOGGER.lock() else {
        tracing::error!("Profiler lock poisoned");
        return;
    };
    if guard.is_some() {
        tracing::warn!("Profiler already initialized");
        return;
    }

    match ProfileLogger::new() {
        Ok(logger) => {
            let session_id = logger.session_id.clone();
            *guard = Some(logger);
            drop(guard); // Release lock before logging
            log_event(EventType::SessionStart { session_id });
        }
        Err(e) => tracing::error!("Failed to initialize profiler: {}", e),
    }
}

/// Flush remaining events and close the profile file.
pub fn shutdown() {
    let total_events = EVENT_COUNT.load(Ordering::Relaxed);
    log_event(EventType::SessionEnd { total_events });

    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_mut() {
            logger.flush();
            tracing::info!("Profiling session ended: {} events logged", total_events);
        }
        *guard = None;
    }
}

pub fn log_event(event_type: EventType) {
    with_logger(ProfileEvent::new(event_type));
}

pub fn log_timed(name: &str, duration: Duration) {
    with_logger(ProfileEvent::with_duration(
        EventType::TimedScope { name: name.to_string() },
        duration,
    ));
}
