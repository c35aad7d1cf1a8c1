//! Error types for packaging operations.
//!
//! Every fatal condition in the pipeline surfaces as an [`Error`]. Subprocess
//! failures keep the tool's exit code so the binary can propagate it.

use super::tool::ExternalToolError;
use std::{
    fmt::Display,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for packaging operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while packaging a release.
#[derive(Error, Debug)]
pub enum Error {
    /// The persisted build-info file does not exist.
    #[error("build info file not found: {}", path.display())]
    MissingBuildInfo {
        /// Expected location of the file
        path: PathBuf,
    },

    /// The build-info file exists but cannot be parsed.
    #[error("malformed build info file {}: {reason}", path.display())]
    MalformedBuildInfo {
        /// Location of the file
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// A required key is absent from the build-info file.
    #[error("build info file {} is missing required field `{field}`", path.display())]
    MissingField {
        /// Location of the file
        path: PathBuf,
        /// Name of the missing key
        field: &'static str,
    },

    /// An external tool could not be run or exited non-zero.
    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),

    /// The artifact name is already taken; artifacts are never overwritten.
    #[error("artifact already exists: {}", path.display())]
    ArtifactExists {
        /// Path of the existing artifact
        path: PathBuf,
    },

    /// The release settings file could not be read or parsed.
    #[error("invalid settings file {}: {reason}", path.display())]
    Config {
        /// Location of the settings file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("{context} ({}): {source}", path.display())]
    Fs {
        /// Operation being performed
        context: String,
        /// Path the operation touched
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO error without path context.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// Path prefix error while relativising staged files.
    #[error("path prefix error: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Zip archive creation error.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Subprocess failures report the tool's own exit code; everything else
    /// maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ExternalTool(e) => e.exit_code(),
            _ => 1,
        }
    }
}

/// Attaches operation and path context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with what was being done and to which path.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

/// Converts an absent value into an [`Error::GenericError`].
pub trait Context<T> {
    /// Fails with `context` as the message when the value is absent.
    fn context<C: Display>(self, context: C) -> Result<T>;

    /// Lazily built variant of [`Context::context`].
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Returns early with a formatted [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::packager::Error::GenericError(format!($($arg)*)))
    };
}
