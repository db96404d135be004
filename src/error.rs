//! Error types for bucketkey.
//!
//! Each module reports its own error type; [`Error`] unifies them for callers
//! that only need a message and an exit status.

use crate::profile::ConfigError;
use crate::provision::ProvisionError;
use thiserror::Error;

/// Result type alias for bucketkey operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for bucketkey.
#[derive(Error, Debug)]
pub enum Error {
    /// Local configuration is missing or unusable. No remote call was made.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A remote call failed part-way through provisioning.
    #[error("Provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    /// Reading operator input failed.
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Provision(_) => 3,
            _ => 1,
        }
    }
}
