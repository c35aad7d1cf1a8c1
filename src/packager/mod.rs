//! Release packaging for NAP source trees.
//!
//! Provisions host dependencies, drives CMake for every build configuration,
//! keeps the persisted build number and produces a timestamped directory or
//! archive of the installed tree.
//!
//! # Platform Support
//!
//! - **Linux**: apt dependencies, Makefile builds, `.tar.xz` archives
//! - **macOS**: Homebrew dependencies, Xcode builds, `.zip` archives
//! - **Windows**: Visual Studio builds, `.zip` archives

pub mod archive;
pub mod build_info;
pub mod checksum;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod platform;
pub mod provision;
pub mod settings;
pub mod timestamp;
pub mod tool;
pub mod utils;

pub use archive::{ArtifactKind, PackageArtifact};
pub use build_info::{BuildInfo, BuildInfoStore};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, Stage};
pub use platform::{BuildConfiguration, PlatformTarget};
pub use settings::{PackageOptions, Settings, SettingsBuilder, SettingsFile};
pub use timestamp::Timestamp;
pub use tool::{ExternalToolError, SystemRunner, ToolCommand, ToolOutput, ToolRunner};
