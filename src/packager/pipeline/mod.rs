//! Packaging run orchestration.
//!
//! This module provides the [`Pipeline`] that drives one release from a
//! source tree to a [`PackageArtifact`](crate::packager::PackageArtifact):
//!
//! 1. Loads the build info and optionally cleans previous builds
//! 2. Recreates the staging directory and provisions dependencies
//! 3. Bumps the build number, then configures, builds and installs
//! 4. Stamps the packaged build info and archives the staging tree
//!
//! # Example
//!
//! ```no_run
//! use nap_release::packager::{Pipeline, PlatformTarget, SettingsBuilder, SystemRunner, Timestamp};
//!
//! # async fn example() -> nap_release::packager::Result<()> {
//! let settings = SettingsBuilder::new().root("/src/nap").build()?;
//! let mut pipeline = Pipeline::new(&settings, &SystemRunner, PlatformTarget::host()?);
//! let artifact = pipeline.run(Timestamp::now()).await?;
//! println!("Packaged to {}", artifact.path().display());
//! # Ok(())
//! # }
//! ```

mod orchestrator;

pub use orchestrator::{Pipeline, Stage, clean_previous_builds};
