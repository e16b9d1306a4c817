//! Exit code derivation
//!
//! Maps the outcome of a task to the process exit code reported when the
//! application shuts down. Precedence:
//!
//! 1. An error carrying its own code ([`ExitCoder`]) wins.
//! 2. Otherwise a caller-supplied [`ExitCodeMapper`] decides, and is also
//!    consulted for successful outcomes.
//! 3. Otherwise any error maps to [`DEFAULT_EXIT_CODE`] and success maps to 0.

use crate::constants::{DEFAULT_EXIT_CODE, SUCCESS_EXIT_CODE};
use crate::error::Error;
use std::sync::Arc;

/// Custom mapping from an optional error to an exit code
pub type ExitCodeMapper = Arc<dyn Fn(Option<&Error>) -> i32 + Send + Sync>;

/// Capability of carrying an explicit exit code
pub trait ExitCoder {
    /// The carried exit code, if any
    fn exit_code(&self) -> Option<i32>;
}

impl ExitCoder for Error {
    fn exit_code(&self) -> Option<i32> {
        match self {
            Error::Exit { code, .. } => Some(*code),
            Error::Lifecycle { source, .. } => source.exit_code(),
            Error::Multiple(errors) => errors.iter().find_map(ExitCoder::exit_code),
            _ => None,
        }
    }
}

/// Compute the exit code for a task outcome
pub fn exit_code_for(error: Option<&Error>, mapper: Option<&ExitCodeMapper>) -> i32 {
    if let Some(code) = error.and_then(ExitCoder::exit_code) {
        return code;
    }
    if let Some(mapper) = mapper {
        return mapper(error);
    }
    match error {
        Some(_) => DEFAULT_EXIT_CODE,
        None => SUCCESS_EXIT_CODE,
    }
}

/// Build an [`ExitCodeMapper`] from a closure
pub fn exit_code_mapper<F>(f: F) -> ExitCodeMapper
where
    F: Fn(Option<&Error>) -> i32 + Send + Sync + 'static,
{
    Arc::new(f)
}
