//! Container event port
//!
//! Everything the container does while assembling, starting and stopping an
//! application is reported as an [`Event`] to an [`EventLogger`].

use serde::Serialize;
use std::time::Duration;

/// Something the container did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A constructor was registered
    Provided {
        /// Constructor label
        constructor: String,
        /// Registration key of the produced value
        output: String,
        /// Registration failure, if any
        error: Option<String>,
    },
    /// A ready-made value was registered
    Supplied {
        /// Registration key of the value
        output: String,
        /// Registration failure, if any
        error: Option<String>,
    },
    /// A constructor ran
    Constructed {
        /// Constructor label
        constructor: String,
        /// Constructor failure, if any
        error: Option<String>,
    },
    /// An invocation is about to run
    Invoking {
        /// Invocation label
        function: String,
    },
    /// An invocation finished
    Invoked {
        /// Invocation label
        function: String,
        /// Invocation failure, if any
        error: Option<String>,
    },
    /// An OnStart hook is about to run
    OnStartExecuting {
        /// Hook name
        hook: String,
    },
    /// An OnStart hook finished
    OnStartExecuted {
        /// Hook name
        hook: String,
        /// Time spent in the hook
        runtime: Duration,
        /// Hook failure, if any
        error: Option<String>,
    },
    /// An OnStop hook is about to run
    OnStopExecuting {
        /// Hook name
        hook: String,
    },
    /// An OnStop hook finished
    OnStopExecuted {
        /// Hook name
        hook: String,
        /// Time spent in the hook
        runtime: Duration,
        /// Hook failure, if any
        error: Option<String>,
    },
    /// Start failed; already-started hooks are being stopped
    RollingBack {
        /// The start failure that triggered the rollback
        start_error: String,
    },
    /// Rollback finished
    RolledBack {
        /// Rollback failure, if any
        error: Option<String>,
    },
    /// The application finished starting
    Started {
        /// Start failure, if any
        error: Option<String>,
    },
    /// A shutdown was requested
    Stopping {
        /// Exit code carried by the request
        exit_code: i32,
    },
    /// The application finished stopping
    Stopped {
        /// Stop failure, if any
        error: Option<String>,
    },
    /// A configuration record was decoded
    Decoded {
        /// Target type name
        type_name: String,
        /// Configuration key, `None` for the root
        key: Option<String>,
        /// Decode failure, if any
        error: Option<String>,
    },
}

impl Event {
    /// Failure carried by this event, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Provided { error, .. }
            | Self::Supplied { error, .. }
            | Self::Constructed { error, .. }
            | Self::Invoked { error, .. }
            | Self::OnStartExecuted { error, .. }
            | Self::OnStopExecuted { error, .. }
            | Self::RolledBack { error, .. }
            | Self::Started { error }
            | Self::Stopped { error }
            | Self::Decoded { error, .. } => error.as_deref(),
            Self::RollingBack { start_error } => Some(start_error),
            Self::Invoking { .. }
            | Self::OnStartExecuting { .. }
            | Self::OnStopExecuting { .. }
            | Self::Stopping { .. } => None,
        }
    }
}

/// Receives container events
pub trait EventLogger: Send + Sync {
    /// Handle one event
    fn log_event(&self, event: &Event);
}
