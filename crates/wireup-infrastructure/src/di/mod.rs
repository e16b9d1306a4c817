//! Dependency injection container
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`app`] | Application container: assembly, lookup, start/stop/run |
//! | [`provider`] | Constructors with parameter and result tags |
//! | [`wiring`] | Ordered, composable blocks of providers and invocations |
//! | [`conditional`] | `when` / `when_not` gates over wiring blocks |
//! | [`unmarshal`] | Providers that decode configuration records |
//! | [`lifecycle`] | Start/stop hooks with rollback |
//! | [`shutdowner`] | Shutdown requests carrying an exit code |
//! | [`walker`] | Read-only traversal of injected dependencies |
//! | [`params`] | `params!` parameter sets |

pub mod app;
pub mod conditional;
pub mod constructor;
pub mod inject;
pub mod key;
pub mod lifecycle;
pub mod params;
pub mod provider;
pub mod resolver;
pub mod shutdowner;
pub mod unmarshal;
pub mod walker;
pub mod wiring;

pub use app::{App, AppBuilder};
pub use conditional::{Conditional, ConditionalExt, when, when_not};
pub use constructor::Constructor;
pub use inject::Inject;
pub use key::Key;
pub use lifecycle::{Hook, Lifecycle};
pub use provider::Provider;
pub use resolver::Resolver;
pub use shutdowner::{ShutdownSignal, Shutdowner};
pub use unmarshal::{Component, ConfigHandle, Prototype, Target, decoding_constructor};
pub use walker::{Node, ParamSet, Presence, Slot, log_dependencies, walk};
pub use wiring::{Invocation, Wiring};
