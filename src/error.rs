//! Error types at the binary boundary.
//!
//! Wraps packaging and command line errors and maps them to process exit
//! codes.

use thiserror::Error;

/// Result type alias for release runs
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type for a release run
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Packaging errors, including configuration and subprocess failures
    #[error(transparent)]
    Packager(#[from] crate::packager::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl ReleaseError {
    /// Process exit code for this error.
    ///
    /// Usage errors exit with 2 like clap's own; a failed subprocess passes
    /// its exit code through.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Cli(_) => 2,
            ReleaseError::Packager(e) => e.exit_code(),
        }
    }
}
