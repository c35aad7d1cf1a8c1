//! Release packaging library for NAP source trees
//!
//! This library builds a NAP source tree with CMake and packages the result:
//! - Linux releases (.tar.xz)
//! - macOS releases (.zip)
//! - Windows releases (.zip)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod packager;

// Re-export commonly used types
pub use error::{CliError, ReleaseError, Result};
