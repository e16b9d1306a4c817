//! The application container
//!
//! [`App`] registers every provider of a [`Wiring`], runs its invocations in
//! order, and drives the lifecycle:
//!
//! ```text
//! App::new(wiring)   register providers, run invocations
//!        │
//!   app.start()      start hooks in order (rollback on failure)
//!        │
//!   app.wait()       shutdown request, or ctrl-c inside `run`
//!        │
//!   app.stop()       stop hooks in reverse
//! ```
//!
//! Values are built lazily, the first time something asks for them, and at
//! most once per application.

use super::lifecycle::Lifecycle;
use super::key::Key;
use super::resolver::{Instance, Registry, Resolver, lock};
use super::shutdowner::{ShutdownSignal, Shutdowner};
use super::wiring::{Entry, Prepared, Wiring};
use crate::config::LifecycleConfig;
use crate::infrastructure::event_logger::TracingLogger;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};
use wireup_domain::constants::SUCCESS_EXIT_CODE;
use wireup_domain::error::{Error, Result};
use wireup_domain::exit::exit_code_for;
use wireup_domain::ports::{Event, EventLogger};

/// Builder for [`App`]
pub struct AppBuilder {
    wiring: Wiring,
    logger: Arc<dyn EventLogger>,
    lifecycle: LifecycleConfig,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self {
            wiring: Wiring::new(),
            logger: Arc::new(TracingLogger::new()),
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl AppBuilder {
    /// Append a wiring block
    pub fn wiring(mut self, wiring: impl Into<Wiring>) -> Self {
        self.wiring = self.wiring.with(wiring);
        self
    }

    /// Send container events to `logger` instead of to tracing
    pub fn logger(mut self, logger: Arc<dyn EventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Use the given start and stop deadlines
    pub fn lifecycle(mut self, lifecycle: LifecycleConfig) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Register the providers and run the invocations
    pub fn build(self) -> Result<App> {
        App::assemble(self)
    }
}

/// An assembled application
pub struct App {
    registry: Registry,
    cache: Mutex<HashMap<usize, Instance>>,
    resolving: Mutex<()>,
    lifecycle: Arc<Lifecycle>,
    shutdowner: Arc<Shutdowner>,
    logger: Arc<dyn EventLogger>,
    timeouts: LifecycleConfig,
}

impl App {
    /// Assemble an application with default settings
    pub fn new(wiring: impl Into<Wiring>) -> Result<Self> {
        Self::builder().wiring(wiring).build()
    }

    /// Start configuring an application
    pub fn builder() -> AppBuilder {
        AppBuilder::default()
    }

    fn assemble(builder: AppBuilder) -> Result<Self> {
        let AppBuilder {
            wiring,
            logger,
            lifecycle: timeouts,
        } = builder;

        let lifecycle = Arc::new(Lifecycle::new(Arc::clone(&logger)));
        let shutdowner = Arc::new(Shutdowner::new());

        let mut registry = Registry::default();
        let built_in = Wiring::options([
            Wiring::supply_arc(Arc::clone(&lifecycle)),
            Wiring::supply_arc(Arc::clone(&shutdowner)),
            Wiring::supply_arc(Arc::clone(&logger)),
        ]);

        let mut problems = Vec::new();
        let mut invocations = Vec::new();
        for entry in built_in.into_entries().into_iter().chain(wiring.into_entries()) {
            match entry {
                Entry::Provide {
                    label,
                    output,
                    supplied,
                    registration,
                } => {
                    let outcome = registration.and_then(|registration| {
                        registry.register(registration).map_err(|err| vec![err])
                    });
                    let error = outcome.as_ref().err().map(|errors| {
                        errors
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; ")
                    });
                    if supplied {
                        logger.log_event(&Event::Supplied { output, error });
                    } else {
                        logger.log_event(&Event::Provided {
                            constructor: label,
                            output,
                            error,
                        });
                    }
                    if let Err(errors) = outcome {
                        problems.extend(errors);
                    }
                }
                Entry::Invoke(Ok(prepared)) => invocations.push(prepared),
                Entry::Invoke(Err(err)) | Entry::Fail(err) => problems.push(err),
            }
        }
        Error::combine(problems)?;

        let app = Self {
            registry,
            cache: Mutex::new(HashMap::new()),
            resolving: Mutex::new(()),
            lifecycle,
            shutdowner,
            logger,
            timeouts,
        };
        debug!(
            providers = app.registry.len(),
            invocations = invocations.len(),
            "Application assembled"
        );

        for invocation in invocations {
            app.invoke(invocation)?;
        }
        Ok(app)
    }

    fn invoke(&self, invocation: Prepared) -> Result<()> {
        self.logger.log_event(&Event::Invoking {
            function: invocation.label.clone(),
        });
        let outcome = self.with_resolver(&invocation.label, |resolver| (invocation.run)(resolver));
        self.logger.log_event(&Event::Invoked {
            function: invocation.label,
            error: outcome.as_ref().err().map(ToString::to_string),
        });
        outcome
    }

    fn with_resolver<R>(&self, requester: &str, f: impl FnOnce(&Resolver<'_>) -> R) -> R {
        let _resolving = lock(&self.resolving);
        let resolver = Resolver::new(&self.registry, &self.cache, &*self.logger, requester);
        f(&resolver)
    }

    /// The single unnamed value of type `T`
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
        self.get_named::<T>(None)
    }

    /// The single value of type `T` registered under `name` (or unnamed)
    pub fn get_named<T: ?Sized + Send + Sync + 'static>(&self, name: Option<&str>) -> Result<Arc<T>> {
        self.with_resolver("App::get", |resolver| {
            resolver
                .resolve::<T>(name)?
                .ok_or_else(|| resolver.missing(Key::single::<T>(name)))
        })
    }

    /// The single value of type `T`, or `None` when nothing provides it
    pub fn try_get<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Option<Arc<T>>> {
        self.with_resolver("App::try_get", |resolver| resolver.resolve::<T>(None))
    }

    /// Every value of type `T` contributed to `group`
    pub fn get_group<T: ?Sized + Send + Sync + 'static>(&self, group: &str) -> Result<Vec<Arc<T>>> {
        self.with_resolver("App::get_group", |resolver| resolver.resolve_group::<T>(group))
    }

    /// The application's hook collection
    pub fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }

    /// The application's shutdown handle
    pub fn shutdowner(&self) -> &Arc<Shutdowner> {
        &self.shutdowner
    }

    /// Run every start hook within the start deadline
    ///
    /// When the deadline passes, the hooks that already started are stopped
    /// within the stop deadline and both failures are returned together.
    pub async fn start(&self) -> Result<()> {
        let outcome = match within(
            "starting application",
            self.timeouts.start_timeout(),
            self.lifecycle.start(),
        )
        .await
        {
            Err(err @ Error::Timeout { .. }) => self.roll_back(err).await,
            outcome => outcome,
        };
        self.logger.log_event(&Event::Started {
            error: outcome.as_ref().err().map(ToString::to_string),
        });
        outcome
    }

    async fn roll_back(&self, start_error: Error) -> Result<()> {
        self.logger.log_event(&Event::RollingBack {
            start_error: start_error.to_string(),
        });
        let rollback = within(
            "rolling back application start",
            self.timeouts.stop_timeout(),
            self.lifecycle.stop(),
        )
        .await;
        self.logger.log_event(&Event::RolledBack {
            error: rollback.as_ref().err().map(ToString::to_string),
        });

        let mut errors = vec![start_error];
        errors.extend(rollback.err());
        Error::combine(errors)
    }

    /// Run the stop hook of every started hook within the stop deadline
    pub async fn stop(&self) -> Result<()> {
        let outcome = within(
            "stopping application",
            self.timeouts.stop_timeout(),
            self.lifecycle.stop(),
        )
        .await;
        self.logger.log_event(&Event::Stopped {
            error: outcome.as_ref().err().map(ToString::to_string),
        });
        outcome
    }

    /// Wait until shutdown is requested
    pub async fn wait(&self) -> ShutdownSignal {
        self.shutdowner.wait().await
    }

    /// Start, wait for shutdown (or ctrl-c), stop, and report the exit code
    ///
    /// A start failure is returned as its exit code without waiting. A stop
    /// failure turns a successful exit code into a failing one.
    pub async fn run(&self) -> i32 {
        self.run_until(tokio::signal::ctrl_c()).await
    }

    /// Like [`run`](Self::run), with `interrupt` in place of ctrl-c
    ///
    /// An interrupt that resolves to an error is logged and ignored; the
    /// application then waits for a shutdown request only.
    pub async fn run_until<F>(&self, interrupt: F) -> i32
    where
        F: Future<Output = io::Result<()>>,
    {
        if let Err(err) = self.start().await {
            warn!(error = %err, "Application failed to start");
            return exit_code_for(Some(&err), None);
        }

        let signal = tokio::select! {
            signal = self.wait() => signal,
            () = interrupted(interrupt) => {
                info!("Interrupt received");
                ShutdownSignal { exit_code: SUCCESS_EXIT_CODE }
            }
        };
        self.logger.log_event(&Event::Stopping {
            exit_code: signal.exit_code,
        });

        match self.stop().await {
            Ok(()) => signal.exit_code,
            Err(err) if signal.exit_code == SUCCESS_EXIT_CODE => exit_code_for(Some(&err), None),
            Err(err) => {
                warn!(error = %err, "Application failed to stop cleanly");
                signal.exit_code
            }
        }
    }
}

async fn interrupted<F>(interrupt: F)
where
    F: Future<Output = io::Result<()>>,
{
    if let Err(err) = interrupt.await {
        warn!(error = %err, "Failed to listen for interrupts, waiting for shutdown only");
        std::future::pending::<()>().await;
    }
}

async fn within<F>(operation: &str, timeout: Duration, work: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match tokio::time::timeout(timeout, work).await {
        Ok(outcome) => outcome,
        Err(_) => Err(Error::Timeout {
            operation: operation.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
