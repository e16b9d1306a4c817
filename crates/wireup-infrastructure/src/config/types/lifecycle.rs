//! Lifecycle configuration types

use crate::constants::{DEFAULT_START_TIMEOUT_MS, DEFAULT_STOP_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Deadlines applied to the start and stop phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Deadline for running every start hook (milliseconds)
    pub start_timeout_ms: u64,

    /// Deadline for running every stop hook (milliseconds)
    pub stop_timeout_ms: u64,
}

impl LifecycleConfig {
    /// Start deadline as a duration
    pub fn start_timeout(&self) -> Duration {
        Duration::from_millis(self.start_timeout_ms)
    }

    /// Stop deadline as a duration
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            start_timeout_ms: DEFAULT_START_TIMEOUT_MS,
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
        }
    }
}
