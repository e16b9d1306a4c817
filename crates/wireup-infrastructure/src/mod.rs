//! # Infrastructure Layer
//!
//! The container, configuration decoding and the runtime pieces that sit on
//! top of them.
//!
//! ## Module Categories
//!
//! ### Container & Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`di`] | Keyed container, providers, conditional wiring, lifecycle |
//! | [`config`] | Figment sources, decode options, layered settings |
//! | [`constants`] | Centralized constants |
//!
//! ### Runtime
//! | Module | Description |
//! |--------|-------------|
//! | [`infrastructure`] | Task runner, printers, event loggers, profiling |
//! | [`net`] | Listener abstraction and listener middleware |
//! | [`tls`] | Throwaway certificates for tests |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`error_ext`] | Context helpers that map foreign errors into domain errors |

pub mod config;
pub mod constants;
pub mod di;
pub mod error_ext;
pub mod infrastructure;
pub mod logging;
pub mod net;
pub mod tls;

pub use error_ext::ErrorContext;

#[doc(hidden)]
pub mod __private {
    pub use wireup_domain::error::Result;
    pub use wireup_domain::value_objects::{Directive, FieldMeta};
}
