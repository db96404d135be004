//! CLI module for bucketkey
//!
//! Argument parsing, prompts, output formatting and the provisioning command.

pub mod interactive;
pub mod output;
pub mod provision;

use anyhow::{Context, Result};
use bucketkey::profile::{ProfilePaths, DEFAULT_PROFILE, DEFAULT_REGION};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// bucketkey - Provision an S3 bucket with its own IAM user and access key
///
/// Creates an IAM user, an S3 bucket, an access key for the user and an inline
/// policy limiting the user to the bucket, then prints `.env` lines.
#[derive(Parser, Debug, Clone)]
#[command(name = "bucketkey")]
#[command(author = "Bucketkey Contributors")]
#[command(version)]
#[command(about = "Provision an S3 bucket with a dedicated IAM user and access key", long_about = None)]
pub struct Cli {
    /// AWS profile whose credentials and region are used
    #[arg(long, env = "AWS_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,

    /// Name of the IAM user to create (prompted for when omitted)
    #[arg(short = 'u', long)]
    pub username: Option<String>,

    /// Name of the S3 bucket to create (prompted for when omitted)
    #[arg(short = 'b', long)]
    pub bucket: Option<String>,

    /// Path to the AWS credentials file [default: ~/.aws/credentials]
    #[arg(long, env = "AWS_SHARED_CREDENTIALS_FILE")]
    pub credentials_file: Option<PathBuf>,

    /// Path to the AWS config file [default: ~/.aws/config]
    #[arg(long, env = "AWS_CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Region used when neither the profile nor [default] sets one
    #[arg(long, default_value = DEFAULT_REGION)]
    pub default_region: String,

    /// Output format for the new credentials
    #[arg(long, default_value = "env")]
    pub output: OutputFormat,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `KEY=value` lines for a .env file
    #[default]
    Env,
    /// JSON object for scripting
    Json,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }

    /// Check if JSON output is requested
    pub fn is_json(&self) -> bool {
        matches!(self.output, OutputFormat::Json)
    }

    /// Locations of the credential and config stores.
    ///
    /// Explicit paths win; anything not given falls back to `~/.aws`.
    pub fn profile_paths(&self) -> Result<ProfilePaths> {
        let home = ProfilePaths::from_home();

        let credentials = self
            .credentials_file
            .clone()
            .or_else(|| home.as_ref().map(|p| p.credentials.clone()))
            .context("could not determine the home directory; pass --credentials-file")?;

        let config = self
            .config_file
            .clone()
            .or_else(|| home.as_ref().map(|p| p.config.clone()))
            .context("could not determine the home directory; pass --config-file")?;

        Ok(ProfilePaths {
            credentials,
            config,
        })
    }
}
