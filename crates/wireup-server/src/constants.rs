//! Diagnostics server constants

/// Default mount prefix for the diagnostics routes
pub const DEFAULT_DIAGNOSTICS_PREFIX: &str = "/debug/pprof";

/// Default bind address
pub const DEFAULT_DIAGNOSTICS_ADDRESS: &str = "127.0.0.1";

/// Default port
pub const DEFAULT_DIAGNOSTICS_PORT: u16 = 6060;

/// Configuration key the settings are usually decoded from
pub const DIAGNOSTICS_SETTINGS_KEY: &str = "diagnostics";

/// Name of the task running the server
pub const DIAGNOSTICS_TASK_NAME: &str = "diagnostics-server";
