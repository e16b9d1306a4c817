//! Diagnostics HTTP routes
//!
//! Runtime introspection endpoints, mounted under a caller-chosen prefix.
//!
//! ## Endpoints
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | `{prefix}` | GET | Index of the available endpoints |
//! | `{prefix}/cmdline` | GET | Command line of the running process, NUL separated |
//! | `{prefix}/heap` | GET | Instant memory and CPU sample |
//! | `{prefix}/profile?seconds=N` | GET | Sample taken after observing the process for N seconds |

use rocket::http::Status;
use rocket::http::uri::Origin;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, Route, get, routes};
use serde::Serialize;
use std::time::Duration;
use wireup_domain::error::{Error, Result};
use wireup_infrastructure::constants::{DEFAULT_PROFILE_WINDOW_SECS, MAX_PROFILE_WINDOW_SECS};
use wireup_infrastructure::infrastructure::profiling::measure_process;
use wireup_infrastructure::infrastructure::{ProcessSample, ProcessSampler};

/// Index entry for one endpoint
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    /// Absolute path of the endpoint
    pub path: String,
    /// What the endpoint returns
    pub description: &'static str,
}

/// Response for the index endpoint
#[derive(Debug, Serialize)]
pub struct DiagnosticsIndex {
    /// Available endpoints
    pub endpoints: Vec<EndpointInfo>,
}

/// Error body returned by the diagnostics endpoints
#[derive(Debug, Serialize)]
pub struct DiagnosticsErrorResponse {
    /// Error message
    pub error: String,
}

type DiagnosticsResult<T> = std::result::Result<Json<T>, (Status, Json<DiagnosticsErrorResponse>)>;

const ENDPOINTS: [(&str, &str); 3] = [
    ("cmdline", "Command line of the running process"),
    ("heap", "Instant memory and CPU sample"),
    ("profile", "Sample after observing the process for ?seconds=N"),
];

fn error_response(status: Status, error: impl ToString) -> (Status, Json<DiagnosticsErrorResponse>) {
    (
        status,
        Json(DiagnosticsErrorResponse {
            error: error.to_string(),
        }),
    )
}

async fn sample_blocking<F>(f: F) -> DiagnosticsResult<ProcessSample>
where
    F: FnOnce() -> Result<ProcessSample> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(sample)) => Ok(Json(sample)),
        Ok(Err(err)) => Err(error_response(Status::InternalServerError, err)),
        Err(err) => Err(error_response(
            Status::InternalServerError,
            format!("sampling did not complete: {err}"),
        )),
    }
}

/// Index of the diagnostics endpoints
#[get("/")]
pub fn index(uri: &Origin<'_>) -> Json<DiagnosticsIndex> {
    let base = uri.path().as_str().trim_end_matches('/');
    Json(DiagnosticsIndex {
        endpoints: ENDPOINTS
            .iter()
            .map(|&(name, description)| EndpointInfo {
                path: format!("{base}/{name}"),
                description,
            })
            .collect(),
    })
}

/// Command line of the running process, arguments separated by NUL bytes
#[get("/cmdline")]
pub fn cmdline() -> String {
    std::env::args().collect::<Vec<_>>().join("\0")
}

/// Instant memory and CPU sample of the running process
#[get("/heap")]
pub async fn heap() -> DiagnosticsResult<ProcessSample> {
    sample_blocking(|| ProcessSampler::new()?.sample()).await
}

/// Sample taken after observing the process for `seconds`
#[get("/profile?<seconds>")]
pub async fn profile(seconds: Option<u64>) -> DiagnosticsResult<ProcessSample> {
    let seconds = seconds.unwrap_or(DEFAULT_PROFILE_WINDOW_SECS);
    if seconds > MAX_PROFILE_WINDOW_SECS {
        return Err(error_response(
            Status::BadRequest,
            format!("profile window of {seconds}s exceeds the {MAX_PROFILE_WINDOW_SECS}s maximum"),
        ));
    }
    sample_blocking(move || measure_process(Duration::from_secs(seconds))).await
}

/// All diagnostics routes, unmounted
pub fn diagnostics_routes() -> Vec<Route> {
    routes![index, cmdline, heap, profile]
}

/// Mount the diagnostics routes on `rocket` under `prefix`
///
/// # Errors
///
/// Returns [`Error::Usage`] when `prefix` is not an absolute URI path.
pub fn mount_diagnostics(rocket: Rocket<Build>, prefix: &str) -> Result<Rocket<Build>> {
    let base = Origin::parse(prefix)
        .map_err(|err| Error::usage(format!("invalid diagnostics prefix {prefix:?}: {err}")))?;
    if base.query().is_some() {
        return Err(Error::usage(format!(
            "diagnostics prefix {prefix:?} cannot carry a query"
        )));
    }
    tracing::debug!(prefix, "mounting diagnostics routes");
    Ok(rocket.mount(prefix, diagnostics_routes()))
}
