//! Application bootstrap
//!
//! Loads configuration, initializes logging, and assembles the demo
//! application from its wiring blocks.

use crate::greeter::greeter;
use std::path::Path;
use tracing::info;
use wireup_domain::error::Result;
use wireup_infrastructure::config::{
    AppSettings, ConfigLoader, ConfigSource, DecodeOptions, load_settings,
};
use wireup_infrastructure::di::{App, ConditionalExt, Wiring, when};
use wireup_infrastructure::logging::{init_logging, log_config_loaded};
use wireup_server::constants::DIAGNOSTICS_SETTINGS_KEY;
use wireup_server::{DiagnosticsSettings, diagnostics_server};

/// Every wiring block of the demo application
///
/// The diagnostics server is only wired in when `diagnostics.enabled` is set.
pub fn application_wiring(source: ConfigSource) -> Result<Wiring> {
    let mut diagnostics = DiagnosticsSettings::default();
    source.unmarshal_key(
        DIAGNOSTICS_SETTINGS_KEY,
        &mut diagnostics,
        &DecodeOptions::new(),
    )?;

    Ok(Wiring::options([
        Wiring::supply(source),
        greeter(),
        when(diagnostics.enabled).then([
            Wiring::supply(diagnostics.clone()),
            diagnostics_server(diagnostics),
        ]),
    ]))
}

/// Assemble the demo application from an already loaded source and the
/// library settings decoded from it
pub fn build_app(source: ConfigSource, settings: &AppSettings) -> Result<App> {
    App::builder()
        .lifecycle(settings.lifecycle.clone())
        .wiring(application_wiring(source)?)
        .build()
}

/// Load configuration, run the demo application, and return its exit code
pub async fn run(config_path: Option<&Path>) -> Result<i32> {
    let loader = match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    let source = loader.load()?;
    let settings = load_settings(&source)?;
    init_logging(settings.logging.clone())?;

    if let Some(path) = loader.resolved_config_path() {
        log_config_loaded(&path, path.exists());
    }

    let app = build_app(source, &settings)?;
    let code = app.run().await;
    info!(exit_code = code, "Application exited");
    Ok(code)
}
