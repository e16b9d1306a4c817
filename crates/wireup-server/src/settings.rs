//! Diagnostics server settings

use crate::constants::{
    DEFAULT_DIAGNOSTICS_ADDRESS, DEFAULT_DIAGNOSTICS_PORT, DEFAULT_DIAGNOSTICS_PREFIX,
};
use serde::{Deserialize, Serialize};

/// Where and whether the diagnostics server listens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsSettings {
    /// Run the server at all
    pub enabled: bool,

    /// Bind address
    pub address: String,

    /// Port to listen on
    pub port: u16,

    /// Mount prefix for the routes
    pub prefix: String,
}

impl Default for DiagnosticsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            address: DEFAULT_DIAGNOSTICS_ADDRESS.to_string(),
            port: DEFAULT_DIAGNOSTICS_PORT,
            prefix: DEFAULT_DIAGNOSTICS_PREFIX.to_string(),
        }
    }
}
