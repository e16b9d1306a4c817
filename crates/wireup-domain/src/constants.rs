//! Domain constants

/// Exit code reported when a task fails without a more specific code
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// Exit code reported for a successful run
pub const SUCCESS_EXIT_CODE: i32 = 0;

/// Separator placed between a scope prefix and a name or group
pub const SCOPE_SEPARATOR: &str = ".";
