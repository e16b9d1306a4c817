//! # Domain Layer
//!
//! Types shared by every wireup crate. Nothing here performs I/O.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy and `Result` alias |
//! | [`exit`] | Exit-code capability and derivation |
//! | [`value_objects`] | Wiring directives, tag builders, dependency records |
//! | [`ports`] | Printer and container event logger traits |

pub mod constants;
pub mod error;
pub mod exit;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use exit::{ExitCodeMapper, ExitCoder, exit_code_for};
