//! SM-2 spaced repetition scheduling for solved algorithm problems.
//!
//! The engine is a set of pure functions: callers pass the current
//! [`domain::RevisionState`], a [`domain::ReviewInput`] and the current time,
//! and persist whatever comes back. Queue ranking and dashboard statistics
//! work over caller-supplied snapshots in the same way.

pub mod config;
pub mod domain;
pub mod error;
pub mod profiling;
pub mod srs;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{EngineError, Result};
