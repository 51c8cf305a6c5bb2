//! Error types for the revision engine.

use thiserror::Error;

/// Errors surfaced by input validation, configuration and the reporting binary.
///
/// A failed review is not an error: it is a normal, successfully computed outcome.
#[derive(Debug, Error)]
pub enum EngineError {
  #[error("quality must be between 0 and 5, got {0}")]
  InvalidQuality(i64),

  #[error("response time must be a positive number of seconds, got {0}")]
  InvalidResponseTime(f64),

  #[error("invalid scheduler configuration: {0}")]
  InvalidConfig(String),

  #[error("failed to parse config file: {0}")]
  ConfigParse(#[from] toml::de::Error),

  #[error("failed to read snapshot: {0}")]
  Snapshot(#[from] serde_json::Error),

  #[error(transparent)]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
