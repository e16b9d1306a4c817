//! Diagnostics server task
//!
//! Runs Rocket with the diagnostics routes for as long as the application
//! runs. The server is stopped through its own shutdown handle when the
//! application cancels the task.

use crate::constants::DIAGNOSTICS_TASK_NAME;
use crate::routes::mount_diagnostics;
use crate::settings::DiagnosticsSettings;
use tokio_util::sync::CancellationToken;
use tracing::info;
use wireup_domain::error::{Error, Result};
use wireup_infrastructure::di::Wiring;
use wireup_infrastructure::infrastructure::Task;

/// Wiring block that serves the diagnostics routes in the background
///
/// The server starts with the application and stops with it. A server that
/// fails to bind ends the task, which requests application shutdown with a
/// nonzero exit code.
pub fn diagnostics_server(settings: DiagnosticsSettings) -> Wiring {
    Wiring::run_task(
        DIAGNOSTICS_TASK_NAME,
        Task::cancellable(move |token| serve(settings, token)),
        None,
    )
}

async fn serve(settings: DiagnosticsSettings, token: CancellationToken) -> Result<()> {
    let figment = rocket::Config::figment()
        .merge(("address", settings.address.as_str()))
        .merge(("port", settings.port))
        .merge(("log_level", "critical"))
        .merge(("shutdown.ctrlc", false));

    let rocket = mount_diagnostics(rocket::custom(figment), &settings.prefix)?;
    let ignited = rocket
        .ignite()
        .await
        .map_err(|err| Error::configuration(format!("diagnostics server: {err}")))?;

    let shutdown = ignited.shutdown();
    let watcher = tokio::spawn(async move {
        token.cancelled().await;
        shutdown.notify();
    });

    info!(
        address = %settings.address,
        port = settings.port,
        prefix = %settings.prefix,
        "Diagnostics server listening"
    );
    let launched = ignited.launch().await;
    watcher.abort();

    launched
        .map(|_| info!("Diagnostics server stopped"))
        .map_err(|err| Error::internal(format!("diagnostics server: {err}")))
}
