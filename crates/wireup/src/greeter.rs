//! Greeter service
//!
//! A small TCP service that writes one greeting line to every client and
//! closes the connection. Its configuration is decoded from the `greeter`
//! key, its dependencies are declared as a parameter set, and its accept
//! loop runs as a cancellable task behind listener middleware.

use serde::{Deserialize, Serialize};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wireup_domain::error::{Error, Result};
use wireup_infrastructure::ErrorContext;
use wireup_infrastructure::config::DecodeOptions;
use wireup_infrastructure::di::{Lifecycle, Node, Provider, Shutdowner, Wiring, log_dependencies};
use wireup_infrastructure::infrastructure::{Task, register_task};
use wireup_infrastructure::net::{
    BoxConnection, BoxListener, ListenerMiddleware, TcpListenerAdapter, apply_middleware, limit,
    logging,
};
use wireup_server::DiagnosticsSettings;

/// Configuration key the greeter is decoded from
pub const GREETER_KEY: &str = "greeter";

/// Name of the task running the accept loop
pub const GREETER_TASK_NAME: &str = "greeter";

/// Greeter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreeterConfig {
    /// Address to listen on
    pub address: String,

    /// Line written to every client
    pub greeting: String,

    /// Connections served at once
    pub max_connections: usize,
}

impl Default for GreeterConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:7070".to_string(),
            greeting: "hello from wireup".to_string(),
            max_connections: 64,
        }
    }
}

wireup_infrastructure::params! {
    /// Dependencies of the greeter
    pub struct GreeterDeps {
        pub config: Arc<GreeterConfig>,
        /// Present when the diagnostics server is wired in
        #[dep(optional)]
        pub diagnostics: Option<Arc<DiagnosticsSettings>>,
    }
}

/// Writes a greeting to every accepted connection
pub struct Greeter {
    config: Arc<GreeterConfig>,
    middleware: Vec<ListenerMiddleware>,
}

impl Greeter {
    /// Build the greeter from its dependencies
    pub fn new(deps: GreeterDeps) -> Result<Self> {
        log_dependencies(&[Node::params(&deps)]);

        if deps.config.max_connections == 0 {
            return Err(Error::configuration(
                "greeter.max_connections must be greater than 0",
            ));
        }
        if let Some(diagnostics) = &deps.diagnostics {
            info!(
                prefix = %diagnostics.prefix,
                port = diagnostics.port,
                "Diagnostics enabled alongside the greeter"
            );
        }

        Ok(Self {
            middleware: vec![limit(deps.config.max_connections), logging()],
            config: deps.config,
        })
    }

    /// The configuration in effect
    pub fn config(&self) -> &GreeterConfig {
        &self.config
    }

    /// Accept connections on `listener` until `token` is cancelled
    pub async fn serve(&self, listener: BoxListener, token: CancellationToken) -> Result<()> {
        let listener = apply_middleware(listener, &self.middleware);
        let local = listener
            .local_addr()
            .io_context("Failed to read greeter address")?;
        info!(address = %local, "Greeter listening");

        loop {
            tokio::select! {
                () = token.cancelled() => {
                    info!("Greeter stopped");
                    return Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok((connection, peer)) => {
                        let line = format!("{}\n", self.config.greeting);
                        tokio::spawn(greet(connection, peer, line));
                    }
                    Err(err) => warn!(error = %err, "Greeter accept failed"),
                },
            }
        }
    }
}

async fn greet(mut connection: BoxConnection, peer: SocketAddr, line: String) {
    match write_line(&mut connection, &line).await {
        Ok(()) => debug!(peer = %peer, "Greeted"),
        Err(err) => warn!(peer = %peer, error = %err, "Failed to greet"),
    }
}

async fn write_line(connection: &mut BoxConnection, line: &str) -> io::Result<()> {
    connection.write_all(line.as_bytes()).await?;
    connection.shutdown().await
}

fn start_greeter(
    greeter: Arc<Greeter>,
    lifecycle: Arc<Lifecycle>,
    shutdowner: Arc<Shutdowner>,
) -> Result<()> {
    register_task(
        &lifecycle,
        shutdowner,
        None,
        GREETER_TASK_NAME,
        Task::cancellable(move |token| async move {
            let address = greeter.config().address.clone();
            let listener = TcpListenerAdapter::bind(address.as_str())
                .await
                .io_context(format!("Failed to bind greeter to {address}"))?;
            greeter.serve(listener.boxed(), token).await
        }),
    );
    Ok(())
}

/// Wiring block for the greeter: decoded configuration, the service itself,
/// and the task that serves it while the application runs
pub fn greeter() -> Wiring {
    Wiring::options([
        Provider::unmarshal_key(GREETER_KEY, GreeterConfig::default(), DecodeOptions::new()).into(),
        Wiring::provide(Greeter::new),
        Wiring::invoke(start_greeter),
    ])
}
