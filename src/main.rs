//! bucketkey - Provision an S3 bucket with a dedicated IAM user
//!
//! This is the main entry point for the bucketkey CLI.

mod cli;

use anyhow::Result;
use cli::output::OutputFormatter;
use cli::provision::ProvisionCommand;
use cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application version information
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Display version if verbose
    if cli.verbosity() >= 2 {
        eprintln!("bucketkey v{} by {}", VERSION, AUTHORS);
    }

    let output = OutputFormatter::new(!cli.no_color, cli.is_json(), cli.verbosity());

    let command = ProvisionCommand::from_cli(&cli)?;
    let exit_code = command.execute(&output).await?;

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 3),
        )
        .with(env_filter)
        .init();
}
