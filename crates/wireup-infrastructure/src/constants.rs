//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `wireup_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "wireup.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "wireup";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "WIREUP";

/// Separator between nested keys in environment variable names
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Key under which the library's own settings live in a configuration source
pub const SETTINGS_KEY: &str = "wireup";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable that overrides the configured log filter
pub const LOG_FILTER_ENV: &str = "WIREUP_LOG";

/// Prefix printed in front of console lifecycle events
pub const CONSOLE_EVENT_PREFIX: &str = "[wireup]";

// ============================================================================
// LIFECYCLE CONSTANTS
// ============================================================================

/// Default deadline for running every start hook (milliseconds)
pub const DEFAULT_START_TIMEOUT_MS: u64 = 15_000;

/// Default deadline for running every stop hook (milliseconds)
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 15_000;

// ============================================================================
// PROFILING CONSTANTS
// ============================================================================

/// Interval between two process samples written by the profile recorder
pub const PROFILE_SAMPLE_INTERVAL_MS: u64 = 250;

/// Upper bound for an on-demand CPU measurement window (seconds)
pub const MAX_PROFILE_WINDOW_SECS: u64 = 60;

/// Default on-demand CPU measurement window (seconds)
pub const DEFAULT_PROFILE_WINDOW_SECS: u64 = 30;

// ============================================================================
// TLS CONSTANTS
// ============================================================================

/// Common name used by the default test certificate template
pub const TEST_CERT_COMMON_NAME: &str = "localhost";

/// File name prefix for generated certificate files
pub const TEST_CERT_FILE_PREFIX: &str = "wireup-test-";
