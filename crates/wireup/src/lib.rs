//! # Wireup
//!
//! Conveniences on top of a keyed dependency-injection container:
//! configuration-decoding providers, fluent parameter tags, conditional
//! wiring, a dependency walker, and a shutdown coordinator that turns task
//! outcomes into process exit codes.
//!
//! ## Example
//!
//! ```ignore
//! use wireup::infrastructure::config::{ConfigSource, DecodeOptions};
//! use wireup::infrastructure::di::{App, Provider, Wiring};
//!
//! let app = App::new(Wiring::options([
//!     Wiring::supply(ConfigSource::from_toml_str("[server]\nport = 8080\n")),
//!     Provider::unmarshal_key("server", ServerConfig::default(), DecodeOptions::new()).into(),
//!     Wiring::provide(Server::new),
//! ]))?;
//! let code = app.run().await;
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Errors, exit codes, tag builders, ports
//! - `infrastructure` - Container, configuration decoding, task runner, listeners
//! - `server` - Diagnostics routes served with Rocket
//! - [`greeter`] - The demo service the `wireup` binary runs
//! - [`bootstrap`] - Builds and runs the demo application from configuration

/// Domain layer - errors, exit codes, tag builders and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use wireup_domain::*;
}

/// Infrastructure layer - container, configuration and runtime
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use wireup_infrastructure::*;
}

/// Server layer - diagnostics routes
///
/// Re-exports from the server crate for convenience
pub mod server {
    pub use wireup_server::*;
}

pub mod bootstrap;
pub mod greeter;

// Re-export commonly used types at the crate root
pub use domain::error::{Error, Result};
pub use infrastructure::di::{App, ConditionalExt, Provider, Wiring, when, when_not};

// Re-export main entry point at the crate root
pub use bootstrap::run;
