//! Settings types
//!
//! Everything here deserializes from the `wireup` key of a configuration
//! source and has sensible defaults for every field.

pub mod app;
pub mod lifecycle;
pub mod logging;

pub use app::AppSettings;
pub use lifecycle::LifecycleConfig;
pub use logging::LoggingConfig;
