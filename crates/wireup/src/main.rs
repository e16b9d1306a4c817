//! Wireup - Entry Point
//!
//! Runs the demo greeter application: a TCP service wired through the
//! container, with the diagnostics server enabled from configuration.

use clap::Parser;

/// Command line interface for the wireup demo
#[derive(Parser, Debug)]
#[command(name = "wireup")]
#[command(about = "Wireup - dependency injection demo service")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let code = wireup::run(cli.config.as_deref()).await?;
    std::process::exit(code)
}
