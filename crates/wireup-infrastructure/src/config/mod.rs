//! Configuration sources, decoding and the library's own settings
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`source`] | Figment-backed configuration source with `unmarshal` operations |
//! | [`decode`] | Decode options and the merge rule between global and call-site options |
//! | [`loader`] | Layered loading: defaults, TOML file, environment |
//! | [`types`] | Settings consumed by the library itself |

pub mod decode;
pub mod loader;
pub mod source;
pub mod types;

pub use decode::{DecodeConfig, DecodeHook, DecodeOption, DecodeOptions};
pub use loader::{ConfigLoader, load_settings};
pub use source::ConfigSource;
pub use types::{AppSettings, LifecycleConfig, LoggingConfig};
