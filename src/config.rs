//! Engine configuration.
//!
//! Scheduler bounds and queue defaults live here. Values resolve with
//! priority `config.toml` > environment (`.env` is loaded first) > defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

/// Default config file, relative to the working directory
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the maximum interval in days
pub const ENV_MAX_INTERVAL: &str = "REVISION_MAX_INTERVAL";

/// Environment variable overriding the queue row limit
pub const ENV_QUEUE_LIMIT: &str = "REVISION_QUEUE_LIMIT";

/// Environment variable naming the snapshot file read by `revision-queue`
pub const ENV_SNAPSHOT_PATH: &str = "REVISION_SNAPSHOT_PATH";

// ==================== Scheduler Configuration ====================

/// SM-2 bounds and fixed intervals.
///
/// `Default` yields the canonical values; changing them changes long-run
/// scheduling behaviour for every item.
#[derive(Debug, Clone, PartialEq)]
pub struct Sm2Config {
    pub min_ease_factor: f64,
    pub max_ease_factor: f64,
    /// Ease assigned to newly learned items
    pub default_ease_factor: f64,
    /// Reviews rated at or above this quality count as successful
    pub passing_quality: u8,
    /// Interval after a failure or the first successful review
    pub initial_interval: u32,
    /// Interval after the second consecutive success
    pub second_interval: u32,
    /// Hard cap applied to every computed interval
    pub max_interval: u32,
    /// Items at or beyond this interval count as mastered
    pub mastered_interval: u32,
}

impl Default for Sm2Config {
    fn default() -> Self {
        Self {
            min_ease_factor: 1.3,
            max_ease_factor: 2.5,
            default_ease_factor: 2.5,
            passing_quality: 3,
            initial_interval: 1,
            second_interval: 6,
            max_interval: 180,
            mastered_interval: 30,
        }
    }
}

impl Sm2Config {
    /// Reject bounds the scheduler cannot honour.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_ease_factor.is_finite() && self.max_ease_factor.is_finite()) {
            return Err(EngineError::InvalidConfig("ease factor bounds must be finite".into()));
        }
        if self.min_ease_factor <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "min_ease_factor must be positive, got {}",
                self.min_ease_factor
            )));
        }
        if self.min_ease_factor > self.max_ease_factor {
            return Err(EngineError::InvalidConfig(format!(
                "min_ease_factor {} exceeds max_ease_factor {}",
                self.min_ease_factor, self.max_ease_factor
            )));
        }
        if !(self.min_ease_factor..=self.max_ease_factor).contains(&self.default_ease_factor) {
            return Err(EngineError::InvalidConfig(format!(
                "default_ease_factor {} is outside {}..={}",
                self.default_ease_factor, self.min_ease_factor, self.max_ease_factor
            )));
        }
        if !(1..=5).contains(&self.passing_quality) {
            return Err(EngineError::InvalidConfig(format!(
                "passing_quality must be within 1..=5, got {}",
                self.passing_quality
            )));
        }
        if self.initial_interval == 0 {
            return Err(EngineError::InvalidConfig(
                "initial_interval must be at least 1 day".into(),
            ));
        }
        if self.second_interval < self.initial_interval {
            return Err(EngineError::InvalidConfig(format!(
                "second_interval {} is shorter than initial_interval {}",
                self.second_interval, self.initial_interval
            )));
        }
        if self.max_interval < self.second_interval {
            return Err(EngineError::InvalidConfig(format!(
                "max_interval {} is shorter than second_interval {}",
                self.max_interval, self.second_interval
            )));
        }
        if self.mastered_interval == 0 {
            return Err(EngineError::InvalidConfig(
                "mastered_interval must be at least 1 day".into(),
            ));
        }
        Ok(())
    }
}

// ==================== Queue Configuration ====================

/// Default number of rows returned by a queue query
pub const DEFAULT_QUEUE_LIMIT: usize = 50;

/// Defaults for building a review queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueueConfig {
    pub limit: usize,
    pub include_upcoming: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_QUEUE_LIMIT,
            include_upcoming: false,
        }
    }
}

// ==================== Engine Configuration ====================

/// Fully resolved configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineConfig {
    pub scheduler: Sm2Config,
    pub queue: QueueConfig,
    /// Snapshot consumed by the `revision-queue` binary when no path is passed
    pub snapshot_path: Option<PathBuf>,
}

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    scheduler: Option<SchedulerSection>,
    queue: Option<QueueSection>,
    snapshot: Option<SnapshotSection>,
}

#[derive(Debug, Default, Deserialize)]
struct SchedulerSection {
    min_ease_factor: Option<f64>,
    max_ease_factor: Option<f64>,
    default_ease_factor: Option<f64>,
    passing_quality: Option<u8>,
    initial_interval: Option<u32>,
    second_interval: Option<u32>,
    max_interval: Option<u32>,
    mastered_interval: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct QueueSection {
    limit: Option<usize>,
    include_upcoming: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct SnapshotSection {
    path: Option<String>,
}

impl FileConfig {
    fn apply(self, config: &mut EngineConfig) {
        if let Some(s) = self.scheduler {
            let target = &mut config.scheduler;
            if let Some(v) = s.min_ease_factor {
                target.min_ease_factor = v;
            }
            if let Some(v) = s.max_ease_factor {
                target.max_ease_factor = v;
            }
            if let Some(v) = s.default_ease_factor {
                target.default_ease_factor = v;
            }
            if let Some(v) = s.passing_quality {
                target.passing_quality = v;
            }
            if let Some(v) = s.initial_interval {
                target.initial_interval = v;
            }
            if let Some(v) = s.second_interval {
                target.second_interval = v;
            }
            if let Some(v) = s.max_interval {
                target.max_interval = v;
            }
            if let Some(v) = s.mastered_interval {
                target.mastered_interval = v;
            }
        }
        if let Some(q) = self.queue {
            if let Some(v) = q.limit {
                config.queue.limit = v;
            }
            if let Some(v) = q.include_upcoming {
                config.queue.include_upcoming = v;
            }
        }
        if let Some(path) = self.snapshot.and_then(|s| s.path) {
            config.snapshot_path = Some(PathBuf::from(path));
        }
    }
}

/// Overlay environment values onto `config`. `lookup` abstracts `std::env::var`
/// so tests need not mutate the process environment.
pub fn apply_env<F>(config: &mut EngineConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_MAX_INTERVAL) {
        match raw.trim().parse::<u32>() {
            Ok(days) => {
                tracing::info!("Using max interval from {}: {}", ENV_MAX_INTERVAL, days);
                config.scheduler.max_interval = days;
            }
            Err(_) => tracing::warn!("Ignoring invalid {}: {:?}", ENV_MAX_INTERVAL, raw),
        }
    }
    if let Some(raw) = lookup(ENV_QUEUE_LIMIT) {
        match raw.trim().parse::<usize>() {
            Ok(limit) => config.queue.limit = limit,
            Err(_) => tracing::warn!("Ignoring invalid {}: {:?}", ENV_QUEUE_LIMIT, raw),
        }
    }
    if let Some(path) = lookup(ENV_SNAPSHOT_PATH) {
        config.snapshot_path = Some(PathBuf::from(path));
    }
}

/// Parse a config file and overlay it onto `config`.
fn apply_file(config: &mut EngineConfig, path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let file: FileConfig = toml::from_str(&contents)?;
    file.apply(config);
    Ok(())
}

/// Load configuration from a specific file on top of the defaults.
///
/// Unlike [`load_config`], a missing or malformed file is an error here.
pub fn load_config_from(path: &Path) -> Result<EngineConfig> {
    let mut config = EngineConfig::default();
    apply_file(&mut config, path)?;
    config.scheduler.validate()?;
    Ok(config)
}

/// Load configuration with priority: config.toml > env > defaults.
///
/// An unreadable or malformed config.toml is logged and skipped; scheduler
/// bounds that fail validation are an error.
pub fn load_config() -> Result<EngineConfig> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let mut config = EngineConfig::default();
    apply_env(&mut config, |key| std::env::var(key).ok());

    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        match apply_file(&mut config, path) {
            Ok(()) => tracing::info!("Loaded configuration from {}", CONFIG_FILE),
            Err(e) => tracing::warn!("Ignoring {}: {}", CONFIG_FILE, e),
        }
    } else {
        tracing::debug!("No {} found, using defaults and environment", CONFIG_FILE);
    }

    config.scheduler.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Sm2Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_ease_factor, 1.3);
        assert_eq!(config.max_ease_factor, 2.5);
        assert_eq!(config.max_interval, 180);
        assert_eq!(config.mastered_interval, 30);
    }

    #[test]
    fn test_validate_rejects_inverted_ease_bounds() {
        let config = Sm2Config {
            min_ease_factor: 2.6,
            ..Sm2Config::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_intervals() {
        let short_cap = Sm2Config {
            max_interval: 3,
            ..Sm2Config::default()
        };
        assert!(short_cap.validate().is_err());

        let zero_initial = Sm2Config {
            initial_interval: 0,
            ..Sm2Config::default()
        };
        assert!(zero_initial.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_passing_quality_out_of_scale() {
        let config = Sm2Config {
            passing_quality: 6,
            ..Sm2Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_partial_file() {
        let file = write_config(
            r#"
            [scheduler]
            max_interval = 365

            [queue]
            limit = 10
            include_upcoming = true
            "#,
        );

        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.scheduler.max_interval, 365);
        // Untouched fields keep their defaults
        assert_eq!(config.scheduler.second_interval, 6);
        assert_eq!(config.queue.limit, 10);
        assert!(config.queue.include_upcoming);
        assert!(config.snapshot_path.is_none());
    }

    #[test]
    fn test_load_config_from_snapshot_path() {
        let file = write_config("[snapshot]\npath = \"data/snapshot.json\"\n");
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.snapshot_path, Some(PathBuf::from("data/snapshot.json")));
    }

    #[test]
    fn test_load_config_from_malformed_file() {
        let file = write_config("[scheduler\nmax_interval = ");
        assert!(matches!(load_config_from(file.path()), Err(EngineError::ConfigParse(_))));
    }

    #[test]
    fn test_load_config_from_invalid_bounds() {
        let file = write_config("[scheduler]\nmin_ease_factor = 3.0\n");
        assert!(matches!(load_config_from(file.path()), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_config_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(load_config_from(&missing), Err(EngineError::Io(_))));
    }

    #[test]
    fn test_apply_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_MAX_INTERVAL, "90"),
            (ENV_QUEUE_LIMIT, "5"),
            (ENV_SNAPSHOT_PATH, "/tmp/snap.json"),
        ]);
        let mut config = EngineConfig::default();
        apply_env(&mut config, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.scheduler.max_interval, 90);
        assert_eq!(config.queue.limit, 5);
        assert_eq!(config.snapshot_path, Some(PathBuf::from("/tmp/snap.json")));
    }

    #[test]
    fn test_apply_env_ignores_garbage() {
        let mut config = EngineConfig::default();
        apply_env(&mut config, |key| match key {
            ENV_MAX_INTERVAL => Some("forever".to_string()),
            ENV_QUEUE_LIMIT => Some("-1".to_string()),
            _ => None,
        });
        assert_eq!(config.scheduler.max_interval, 180);
        assert_eq!(config.queue.limit, DEFAULT_QUEUE_LIMIT);
    }

    #[test]
    fn test_file_overrides_env() {
        let file = write_config("[scheduler]\nmax_interval = 120\n");
        let mut config = EngineConfig::default();
        apply_env(&mut config, |key| (key == ENV_MAX_INTERVAL).then(|| "60".to_string()));
        apply_file(&mut config, file.path()).unwrap();
        assert_eq!(config.scheduler.max_interval, 120);
    }
}
