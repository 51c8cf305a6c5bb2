use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revision_engine::domain::{ReviewRecord, TrackedProblem};
use revision_engine::srs::{self, QueueOptions, ReviewQueue, RevisionStats};
use revision_engine::{config, profile_scope, profiling, EngineError, Result};

/// Input file: tracked problems plus their review history
#[derive(Debug, Deserialize)]
struct Snapshot {
  problems: Vec<TrackedProblem>,
  #[serde(default)]
  history: Vec<ReviewRecord>,
}

#[derive(Debug, Serialize)]
struct Report {
  generated_at: DateTime<Utc>,
  queue: ReviewQueue,
  stats: RevisionStats,
}

fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "revision_engine=debug,revision_queue=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  // Initialize profiling (no-op if feature disabled)
  profiling::init();

  let status = match run() {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      tracing::error!("revision-queue failed: {}", e);
      ExitCode::FAILURE
    }
  };

  profiling::shutdown();
  status
}

fn run() -> Result<()> {
  let config = config::load_config()?;

  let snapshot_path = std::env::args()
    .nth(1)
    .map(PathBuf::from)
    .or_else(|| config.snapshot_path.clone())
    .ok_or_else(|| {
      EngineError::InvalidConfig(format!(
        "no snapshot given: pass a path or set {}",
        config::ENV_SNAPSHOT_PATH
      ))
    })?;

  tracing::info!("Reading snapshot from {}", snapshot_path.display());
  let contents = std::fs::read_to_string(&snapshot_path)?;
  let snapshot: Snapshot = serde_json::from_str(&contents)?;

  let now = Utc::now();
  let options = QueueOptions::from(&config.queue);

  let queue = profile_scope!("build_review_queue", {
    srs::build_review_queue(&snapshot.problems, now, &options)
  });

  let states: Vec<_> = snapshot.problems.iter().map(|p| p.state.clone()).collect();
  let stats = srs::compute_stats_with_config(&states, &snapshot.history, now, &config.scheduler);

  tracing::info!(
    "{} problems tracked, {} due ({} critical), retention {}%",
    stats.total_scheduled,
    queue.summary.total_due,
    queue.summary.critical,
    stats.retention_rate
  );

  let report = Report {
    generated_at: now,
    queue,
    stats,
  };

  let stdout = std::io::stdout();
  let mut out = stdout.lock();
  serde_json::to_writer_pretty(&mut out, &report)?;
  writeln!(out)?;
  Ok(())
}
