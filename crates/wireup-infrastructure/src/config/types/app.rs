//! Top-level settings for the library

use super::{LifecycleConfig, LoggingConfig};
use serde::{Deserialize, Serialize};

/// Settings read from the `wireup` key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Logging setup
    pub logging: LoggingConfig,

    /// Lifecycle deadlines
    pub lifecycle: LifecycleConfig,
}
