//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wireup
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// I/O operation error (with context)
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Generic error from external sources
    #[error("Generic error: {0}")]
    Generic(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration-related error, including decode failures
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Misuse of the wiring API (bad tags, empty names, duplicate providers)
    #[error("Usage error: {message}")]
    Usage {
        /// Description of the misuse
        message: String,
    },

    /// A required dependency has no provider
    #[error("Missing dependency: {key} (required by {required_by})")]
    MissingDependency {
        /// Human readable key (type plus name or group)
        key: String,
        /// Constructor or invocation that asked for it
        required_by: String,
    },

    /// Providers depend on each other in a loop
    #[error("Dependency cycle detected: {path}")]
    Cycle {
        /// Provider labels in resolution order, joined by " -> "
        path: String,
    },

    /// A lifecycle hook failed
    #[error("Lifecycle hook \"{hook}\" failed: {source}")]
    Lifecycle {
        /// Hook name
        hook: String,
        /// Hook error
        #[source]
        source: Box<Error>,
    },

    /// An operation exceeded its deadline
    #[error("Timed out after {timeout_ms}ms: {operation}")]
    Timeout {
        /// What was running
        operation: String,
        /// Deadline in milliseconds
        timeout_ms: u64,
    },

    /// Several independent failures collected from a batch operation
    #[error("{}", join_errors(.0))]
    Multiple(Vec<Error>),

    /// An error that carries the process exit code it should map to
    #[error("{source}")]
    Exit {
        /// Exit code to report
        code: i32,
        /// The wrapped error
        #[source]
        source: Box<Error>,
    },

    /// TLS certificate generation error
    #[error("TLS error: {message}")]
    Tls {
        /// Description of the TLS error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

fn join_errors(errors: &[Error]) -> String {
    match errors {
        [] => "no errors".to_string(),
        [single] => single.to_string(),
        many => {
            let joined = many
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            format!("{} errors occurred: {}", many.len(), joined)
        }
    }
}

// Basic error creation methods
impl Error {
    /// Create a generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into().into())
    }

    /// Create a usage error
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a TLS error with source
    pub fn tls_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Tls {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Aggregation and exit-code helpers
impl Error {
    /// Wrap this error so that it maps to `code` when the application exits
    pub fn with_exit_code(self, code: i32) -> Self {
        Self::Exit {
            code,
            source: Box::new(self),
        }
    }

    /// Collapse a list of errors: none yields `Ok`, one is returned as-is,
    /// several become [`Error::Multiple`].
    pub fn combine(mut errors: Vec<Error>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }

    /// Errors contained in this one; a non-aggregate error yields itself
    pub fn errors(&self) -> Vec<&Error> {
        match self {
            Self::Multiple(errors) => errors.iter().flat_map(Error::errors).collect(),
            other => vec![other],
        }
    }
}
