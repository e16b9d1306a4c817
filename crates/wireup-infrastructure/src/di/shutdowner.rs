//! Shutdown requests
//!
//! Any component holding the [`Shutdowner`] can ask the application to stop
//! with an exit code. The first request wins; later requests are ignored.

use std::fmt;
use tokio::sync::watch;
use tracing::debug;
use wireup_domain::constants::DEFAULT_EXIT_CODE;

/// A pending shutdown request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShutdownSignal {
    /// Exit code the process should report
    pub exit_code: i32,
}

/// Handle for requesting that the application stop
pub struct Shutdowner {
    sender: watch::Sender<Option<ShutdownSignal>>,
}

impl Default for Shutdowner {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdowner {
    /// Create a handle with no pending request
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Request shutdown with `exit_code`
    ///
    /// Returns `false` when a request was already pending.
    pub fn shutdown(&self, exit_code: i32) -> bool {
        let accepted = self.sender.send_if_modified(|pending| {
            if pending.is_some() {
                return false;
            }
            *pending = Some(ShutdownSignal { exit_code });
            true
        });
        if accepted {
            debug!(exit_code, "Shutdown requested");
        } else {
            debug!(exit_code, "Shutdown already pending, request ignored");
        }
        accepted
    }

    /// The pending request, if any
    pub fn signal(&self) -> Option<ShutdownSignal> {
        *self.sender.borrow()
    }

    /// Wait until shutdown is requested
    pub async fn wait(&self) -> ShutdownSignal {
        let mut receiver = self.sender.subscribe();
        let signal = receiver
            .wait_for(Option::is_some)
            .await
            .ok()
            .and_then(|signal| *signal);
        signal.unwrap_or(ShutdownSignal {
            exit_code: DEFAULT_EXIT_CODE,
        })
    }

    /// Subscribe to shutdown requests
    pub fn subscribe(&self) -> watch::Receiver<Option<ShutdownSignal>> {
        self.sender.subscribe()
    }
}

impl fmt::Debug for Shutdowner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shutdowner")
            .field("signal", &self.signal())
            .finish()
    }
}
