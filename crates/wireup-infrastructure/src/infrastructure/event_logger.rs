//! Container event loggers
//!
//! [`TracingLogger`] is what an application uses unless told otherwise.
//! [`PrinterLogger`] renders the compact console format on any [`Printer`],
//! [`RecordingLogger`] keeps events in memory for inspection.

use crate::constants::CONSOLE_EVENT_PREFIX;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error, info, warn};
use wireup_domain::ports::{Event, EventLogger, Printer};

/// Reports events through tracing
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create a logger
    pub fn new() -> Self {
        Self
    }
}

impl EventLogger for TracingLogger {
    fn log_event(&self, event: &Event) {
        match event {
            Event::Provided {
                constructor,
                output,
                error: None,
            } => debug!(constructor = %constructor, output = %output, "Provided"),
            Event::Supplied {
                output,
                error: None,
            } => debug!(output = %output, "Supplied"),
            Event::Provided {
                error: Some(err), ..
            }
            | Event::Supplied {
                error: Some(err), ..
            } => error!(error = %err, "Error encountered while registering a provider"),
            Event::Constructed {
                constructor,
                error: None,
            } => debug!(constructor = %constructor, "Constructed"),
            Event::Constructed {
                constructor,
                error: Some(err),
            } => warn!(constructor = %constructor, error = %err, "Constructor failed"),
            Event::Invoking { function } => debug!(function = %function, "Invoking"),
            Event::Invoked {
                function,
                error: Some(err),
            } => error!(function = %function, error = %err, "Invoke failed"),
            Event::Invoked { .. } => {}
            Event::OnStartExecuting { hook } => debug!(hook = %hook, "OnStart hook executing"),
            Event::OnStartExecuted {
                hook,
                runtime,
                error,
            } => match error {
                None => debug!(hook = %hook, runtime = ?runtime, "OnStart hook executed"),
                Some(err) => error!(hook = %hook, error = %err, "OnStart hook failed"),
            },
            Event::OnStopExecuting { hook } => debug!(hook = %hook, "OnStop hook executing"),
            Event::OnStopExecuted {
                hook,
                runtime,
                error,
            } => match error {
                None => debug!(hook = %hook, runtime = ?runtime, "OnStop hook executed"),
                Some(err) => error!(hook = %hook, error = %err, "OnStop hook failed"),
            },
            Event::RollingBack { start_error } => {
                error!(error = %start_error, "Start failed, rolling back")
            }
            Event::RolledBack { error: Some(err) } => error!(error = %err, "Rollback failed"),
            Event::RolledBack { error: None } => debug!("Rolled back"),
            Event::Started { error: None } => info!("Started"),
            Event::Started { error: Some(err) } => error!(error = %err, "Start failed"),
            Event::Stopping { exit_code } => info!(exit_code, "Stopping"),
            Event::Stopped { error: None } => info!("Stopped"),
            Event::Stopped { error: Some(err) } => error!(error = %err, "Stop failed"),
            Event::Decoded {
                type_name,
                key,
                error: None,
            } => debug!(type_name = %type_name, key = ?key, "Decoded configuration"),
            Event::Decoded {
                type_name,
                key,
                error: Some(err),
            } => warn!(type_name = %type_name, key = ?key, error = %err, "Decoding configuration failed"),
        }
    }
}

/// Renders events as short console lines on a printer
pub struct PrinterLogger {
    printer: Arc<dyn Printer>,
}

impl PrinterLogger {
    /// Logger printing on `printer`
    pub fn new(printer: Arc<dyn Printer>) -> Self {
        Self { printer }
    }
}

impl EventLogger for PrinterLogger {
    fn log_event(&self, event: &Event) {
        let p = &self.printer;
        let prefix = CONSOLE_EVENT_PREFIX;
        match event {
            Event::Provided {
                constructor,
                output,
                error: None,
            } => p.print(format_args!("{prefix} PROVIDE\t{output} <= {constructor}")),
            Event::Supplied {
                output,
                error: None,
            } => p.print(format_args!("{prefix} SUPPLY\t{output}")),
            Event::Provided {
                error: Some(err), ..
            }
            | Event::Supplied {
                error: Some(err), ..
            } => p.print(format_args!("{prefix} Error after options were applied: {err}")),
            Event::Constructed {
                constructor,
                error: Some(err),
            } => p.print(format_args!("{prefix} ERROR\t\tconstructing {constructor}: {err}")),
            Event::Constructed { .. } => {}
            Event::Invoking { function } => p.print(format_args!("{prefix} INVOKE\t\t{function}")),
            Event::Invoked {
                function,
                error: Some(err),
            } => p.print(format_args!("{prefix} ERROR\t\tinvoke {function} failed: {err}")),
            Event::Invoked { .. } => {}
            Event::OnStartExecuting { hook } => {
                p.print(format_args!("{prefix} HOOK OnStart\t\t{hook} executing"))
            }
            Event::OnStartExecuted {
                hook,
                runtime,
                error,
            } => match error {
                None => p.print(format_args!(
                    "{prefix} HOOK OnStart\t\t{hook} called by lifecycle ran successfully in {runtime:?}"
                )),
                Some(err) => p.print(format_args!("{prefix} HOOK OnStart\t\t{hook} failed: {err}")),
            },
            Event::OnStopExecuting { hook } => {
                p.print(format_args!("{prefix} HOOK OnStop\t\t{hook} executing"))
            }
            Event::OnStopExecuted {
                hook,
                runtime,
                error,
            } => match error {
                None => p.print(format_args!(
                    "{prefix} HOOK OnStop\t\t{hook} called by lifecycle ran successfully in {runtime:?}"
                )),
                Some(err) => p.print(format_args!("{prefix} HOOK OnStop\t\t{hook} failed: {err}")),
            },
            Event::RollingBack { start_error } => {
                p.print(format_args!("{prefix} ERROR\t\tStart failed, rolling back: {start_error}"))
            }
            Event::RolledBack { error: Some(err) } => {
                p.print(format_args!("{prefix} ERROR\t\tCouldn't roll back cleanly: {err}"))
            }
            Event::RolledBack { error: None } => {}
            Event::Started { error: None } => p.print(format_args!("{prefix} RUNNING")),
            Event::Started { error: Some(err) } => {
                p.print(format_args!("{prefix} ERROR\t\tFailed to start: {err}"))
            }
            Event::Stopping { exit_code } => {
                p.print(format_args!("{prefix} STOPPING\texit code {exit_code}"))
            }
            Event::Stopped { error: Some(err) } => {
                p.print(format_args!("{prefix} ERROR\t\tFailed to stop cleanly: {err}"))
            }
            Event::Stopped { error: None } => {}
            Event::Decoded {
                type_name,
                key,
                error,
            } => {
                let from = key.as_deref().unwrap_or("<root>");
                match error {
                    None => p.print(format_args!("{prefix} DECODE\t\t{type_name} <= {from}")),
                    Some(err) => p.print(format_args!(
                        "{prefix} ERROR\t\tdecoding {type_name} from {from}: {err}"
                    )),
                }
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NopLogger;

impl EventLogger for NopLogger {
    fn log_event(&self, _event: &Event) {}
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingLogger {
    events: Mutex<Vec<Event>>,
}

impl RecordingLogger {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Events received so far, in order
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventLogger for RecordingLogger {
    fn log_event(&self, event: &Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
