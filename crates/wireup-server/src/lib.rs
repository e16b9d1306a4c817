//! # Diagnostics server
//!
//! Runtime diagnostics for a wireup application, served over HTTP with
//! Rocket under a caller-chosen prefix.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`routes`] | Index, command line, memory and CPU sampling endpoints |
//! | [`settings`] | Where and whether the diagnostics server listens |
//! | [`server`] | Wiring block that runs the server for the application's lifetime |

pub mod constants;
pub mod routes;
pub mod server;
pub mod settings;

pub use routes::{diagnostics_routes, mount_diagnostics};
pub use server::diagnostics_server;
pub use settings::DiagnosticsSettings;
