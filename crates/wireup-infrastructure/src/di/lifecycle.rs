//! Start and stop hooks
//!
//! Hooks start in registration order and stop in reverse. When a start hook
//! fails, the hooks that already started are stopped again (rolled back)
//! before the failure is returned. Only hooks whose start succeeded are
//! stopped.

use super::resolver::lock;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use wireup_domain::error::{Error, Result};
use wireup_domain::ports::{Event, EventLogger};

/// Deferred hook body
pub type HookFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

/// A named pair of start and stop callbacks
pub struct Hook {
    name: String,
    on_start: Option<HookFn>,
    on_stop: Option<HookFn>,
}

impl Hook {
    /// Hook without callbacks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_start: None,
            on_stop: None,
        }
    }

    /// Run `f` when the application starts
    pub fn on_start<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_start = Some(Box::new(move || f().boxed()));
        self
    }

    /// Run `f` when the application stops
    pub fn on_stop<F, Fut>(mut self, f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_stop = Some(Box::new(move || f().boxed()));
        self
    }

    /// Hook name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("name", &self.name)
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .finish()
    }
}

/// Ordered collection of hooks owned by one application
pub struct Lifecycle {
    hooks: Mutex<Vec<Hook>>,
    started: Mutex<usize>,
    logger: Arc<dyn EventLogger>,
}

impl Lifecycle {
    pub(crate) fn new(logger: Arc<dyn EventLogger>) -> Self {
        Self {
            hooks: Mutex::new(Vec::new()),
            started: Mutex::new(0),
            logger,
        }
    }

    /// Register a hook after every hook registered so far
    pub fn append(&self, hook: Hook) {
        lock(&self.hooks).push(hook);
    }

    /// Number of registered hooks
    pub fn len(&self) -> usize {
        lock(&self.hooks).len()
    }

    /// Whether no hook is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every start callback in order, rolling back on failure
    pub(crate) async fn start(&self) -> Result<()> {
        let mut index = 0;
        loop {
            let next = {
                let mut hooks = lock(&self.hooks);
                hooks
                    .get_mut(index)
                    .map(|hook| (hook.name.clone(), hook.on_start.take()))
            };
            let Some((name, on_start)) = next else {
                return Ok(());
            };

            if let Some(on_start) = on_start {
                self.logger
                    .log_event(&Event::OnStartExecuting { hook: name.clone() });
                let began = Instant::now();
                let outcome = on_start().await;
                self.logger.log_event(&Event::OnStartExecuted {
                    hook: name.clone(),
                    runtime: began.elapsed(),
                    error: outcome.as_ref().err().map(ToString::to_string),
                });

                if let Err(err) = outcome {
                    let start_error = Error::Lifecycle {
                        hook: name,
                        source: Box::new(err),
                    };
                    self.logger.log_event(&Event::RollingBack {
                        start_error: start_error.to_string(),
                    });
                    let rollback = self.stop().await;
                    self.logger.log_event(&Event::RolledBack {
                        error: rollback.as_ref().err().map(ToString::to_string),
                    });

                    let mut errors = vec![start_error];
                    errors.extend(rollback.err());
                    return Error::combine(errors);
                }
            }

            index += 1;
            *lock(&self.started) = index;
        }
    }

    /// Run the stop callbacks of every started hook in reverse order
    ///
    /// Every callback runs even when an earlier one fails; the failures are
    /// returned together.
    pub(crate) async fn stop(&self) -> Result<()> {
        let started = std::mem::take(&mut *lock(&self.started));
        let mut errors = Vec::new();

        for index in (0..started).rev() {
            let next = {
                let mut hooks = lock(&self.hooks);
                hooks
                    .get_mut(index)
                    .map(|hook| (hook.name.clone(), hook.on_stop.take()))
            };
            let Some((name, Some(on_stop))) = next else {
                continue;
            };

            self.logger
                .log_event(&Event::OnStopExecuting { hook: name.clone() });
            let began = Instant::now();
            let outcome = on_stop().await;
            self.logger.log_event(&Event::OnStopExecuted {
                hook: name.clone(),
                runtime: began.elapsed(),
                error: outcome.as_ref().err().map(ToString::to_string),
            });

            if let Err(err) = outcome {
                errors.push(Error::Lifecycle {
                    hook: name,
                    source: Box::new(err),
                });
            }
        }

        Error::combine(errors)
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("hooks", &self.len())
            .field("started", &*lock(&self.started))
            .finish()
    }
}
