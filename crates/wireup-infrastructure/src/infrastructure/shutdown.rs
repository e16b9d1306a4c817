//! Shutdown Coordinator
//!
//! Runs one background task and, when it finishes, asks the application to
//! shut down with an exit code derived from the task's outcome. Built on
//! tokio-util primitives:
//! - `CancellationToken` to ask cooperative tasks to finish
//! - `TaskTracker` to wait for running tasks when the application stops
//!
//! ## Usage
//!
//! ```rust,ignore
//! let wiring = Wiring::run_task(
//!     "accept-loop",
//!     Task::cancellable(|token| async move { serve(token).await }),
//!     None,
//! );
//! ```

use crate::di::lifecycle::{Hook, Lifecycle};
use crate::di::shutdowner::Shutdowner;
use crate::di::wiring::{Invocation, Wiring};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use wireup_domain::error::{Error, Result};
use wireup_domain::exit::{ExitCodeMapper, exit_code_for};

/// Grace period granted to running tasks when the application stops
pub const TASK_STOP_GRACE: Duration = Duration::from_secs(5);

type CancellableFn = Box<dyn FnOnce(CancellationToken) -> BoxFuture<'static, Result<()>> + Send>;

/// The shapes of work the coordinator can run
pub enum Task {
    /// Synchronous work without a result
    Blocking(Box<dyn FnOnce() + Send>),
    /// Synchronous work that can fail
    Fallible(Box<dyn FnOnce() -> Result<()> + Send>),
    /// Asynchronous work that can fail
    Async(BoxFuture<'static, Result<()>>),
    /// Asynchronous work that stops when its token is cancelled
    Cancellable(CancellableFn),
}

impl Task {
    /// Synchronous work without a result
    pub fn blocking<F>(f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::Blocking(Box::new(f))
    }

    /// Synchronous work that can fail
    pub fn fallible<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        Self::Fallible(Box::new(f))
    }

    /// Asynchronous work that can fail
    pub fn future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::Async(future.boxed())
    }

    /// Asynchronous work that observes a cancellation token
    pub fn cancellable<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self::Cancellable(Box::new(move |token| f(token).boxed()))
    }

    fn shape(&self) -> &'static str {
        match self {
            Self::Blocking(_) => "blocking",
            Self::Fallible(_) => "fallible",
            Self::Async(_) => "async",
            Self::Cancellable(_) => "cancellable",
        }
    }

    async fn execute(self, token: CancellationToken) -> Result<()> {
        let joined = match self {
            Self::Blocking(f) => tokio::task::spawn_blocking(move || {
                f();
                Ok(())
            })
            .await,
            Self::Fallible(f) => tokio::task::spawn_blocking(f).await,
            Self::Async(future) => tokio::spawn(future).await,
            Self::Cancellable(f) => tokio::spawn(f(token)).await,
        };
        joined.unwrap_or_else(|err| Err(Error::internal(format!("task did not complete: {err}"))))
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task::{}", self.shape())
    }
}

/// Runs tasks and turns their completion into a shutdown request
#[derive(Clone)]
pub struct TaskRunner {
    cancel_token: CancellationToken,
    task_tracker: TaskTracker,
    shutdowner: Arc<Shutdowner>,
    mapper: Option<ExitCodeMapper>,
}

impl TaskRunner {
    /// Runner signalling `shutdowner`
    pub fn new(shutdowner: Arc<Shutdowner>) -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
            shutdowner,
            mapper: None,
        }
    }

    /// Derive exit codes with `mapper` when the outcome carries none
    pub fn with_exit_code_mapper(mut self, mapper: Option<ExitCodeMapper>) -> Self {
        self.mapper = mapper;
        self
    }

    /// Get a child cancellation token
    pub fn child_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    /// Check if shutdown has been initiated
    pub fn is_shutting_down(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Get the number of running tasks
    pub fn active_tasks(&self) -> usize {
        self.task_tracker.len()
    }

    /// Run `task` in the background, then request shutdown
    ///
    /// The handle resolves to the exit code that was requested. A task that
    /// panics still requests shutdown, with the default failing code.
    pub fn run_and_shutdown(&self, name: &str, task: Task) -> JoinHandle<i32> {
        let token = self.child_token();
        let shutdowner = Arc::clone(&self.shutdowner);
        let mapper = self.mapper.clone();
        let name = name.to_string();
        debug!(task = %name, shape = task.shape(), "Spawning task");

        let tracked = self.task_tracker.track_future(async move {
            let outcome = task.execute(token).await;
            let code = exit_code_for(outcome.as_ref().err(), mapper.as_ref());
            match &outcome {
                Ok(()) => info!(task = %name, exit_code = code, "Task finished"),
                Err(err) => warn!(task = %name, exit_code = code, error = %err, "Task failed"),
            }
            shutdowner.shutdown(code);
            code
        });
        tokio::spawn(tracked)
    }

    /// Cancel running tasks and wait for them up to `timeout`
    ///
    /// Returns `true` if all tasks completed before timeout, `false` otherwise.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.cancel_token.cancel();
        self.task_tracker.close();

        tokio::select! {
            _ = self.task_tracker.wait() => true,
            _ = tokio::time::sleep(timeout) => {
                warn!(
                    active = self.task_tracker.len(),
                    "Timeout reached while waiting for tasks"
                );
                false
            }
        }
    }
}

/// Run `task` for the lifetime of the application
///
/// The task starts with the application's start hooks. When it finishes the
/// application is asked to shut down; when the application stops first, the
/// task's token is cancelled.
pub fn register_task(
    lifecycle: &Lifecycle,
    shutdowner: Arc<Shutdowner>,
    mapper: Option<ExitCodeMapper>,
    name: &str,
    task: Task,
) {
    let runner = TaskRunner::new(shutdowner).with_exit_code_mapper(mapper);
    let stopper = runner.clone();
    let task_name = name.to_string();

    lifecycle.append(
        Hook::new(name)
            .on_start(move || async move {
                runner.run_and_shutdown(&task_name, task);
                Ok(())
            })
            .on_stop(move || async move {
                stopper.shutdown(TASK_STOP_GRACE).await;
                Ok(())
            }),
    );
}

impl Wiring {
    /// Run `task` in the background once the application has started
    pub fn run_task(name: impl Into<String>, task: Task, mapper: Option<ExitCodeMapper>) -> Self {
        let name = name.into();
        let label = format!("run task {name}");
        let slot = Mutex::new(Some((task, mapper)));
        Wiring::from(
            Invocation::new(
                move |lifecycle: Arc<Lifecycle>, shutdowner: Arc<Shutdowner>| -> Result<()> {
                    let taken = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
                    let (task, mapper) = taken.ok_or_else(|| {
                        Error::usage(format!("task {name} can only be registered once"))
                    })?;
                    register_task(&lifecycle, shutdowner, mapper, &name, task);
                    Ok(())
                },
            )
            .label(label),
        )
    }
}
