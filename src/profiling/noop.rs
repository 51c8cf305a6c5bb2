//! No-op implementations when profiling is disabled.
//!
//! Every function here is an empty `#[inline(always)]` body, so calls vanish
//! from release builds.

use std::time::Duration;

#[inline(always)]
pub fn init() {}

#[inline(always)]
pub fn shutdown() {}

#[inline(always)]
pub fn log_event<T>(_: T) {}

#[inline(always)]
pub fn log_timed(_: &str, _: Duration) {}
