//! Platform-specific provisioning, build and archive steps.
//!
//! [`PlatformTarget`] is resolved once from the host and dispatches every
//! per-platform step to the [`linux`], [`macos`] or [`windows`] module. The
//! branches are plain code, not `cfg` gates, so any host can drive (and
//! test) any branch.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::{
    bail,
    packager::{
        error::Result,
        settings::Settings,
        timestamp::Timestamp,
        tool::ToolRunner,
    },
};
use std::{fmt, path::PathBuf};

/// Operating system family a release is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformTarget {
    Linux,
    MacOs,
    Windows,
}

impl PlatformTarget {
    /// Platform of the running host.
    pub fn host() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Maps a `std::env::consts::OS` value.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::MacOs),
            "windows" => Ok(Self::Windows),
            other => bail!("Packaging is not supported on this platform: {}", other),
        }
    }

    /// Token used in artifact names.
    pub fn token(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::MacOs => "macOS",
            Self::Windows => "Win64",
        }
    }

    /// Extension of the compressed artifact, without the leading dot.
    pub fn archive_extension(self) -> &'static str {
        match self {
            Self::Linux => "tar.xz",
            Self::MacOs | Self::Windows => "zip",
        }
    }

    /// Whether one build directory holds every configuration.
    ///
    /// Makefile generators are single-configuration; Xcode and Visual Studio
    /// are configured once and select the configuration at build time.
    pub fn is_multi_config(self) -> bool {
        !matches!(self, Self::Linux)
    }

    /// Installs missing host dependencies.
    pub async fn provision<R: ToolRunner>(self, settings: &Settings, runner: &R) -> Result<()> {
        match self {
            Self::Linux => linux::provision(settings, runner).await,
            Self::MacOs => macos::provision(settings, runner).await,
            Self::Windows => windows::provision(settings, runner).await,
        }
    }

    /// Generates the native project.
    ///
    /// `configuration` is required for single-configuration generators and
    /// ignored by the others.
    pub async fn configure<R: ToolRunner>(
        self,
        ctx: &BuildContext<'_, R>,
        configuration: Option<BuildConfiguration>,
    ) -> Result<()> {
        match self {
            Self::Linux => linux::configure(ctx, configuration).await,
            Self::MacOs => macos::configure(ctx).await,
            Self::Windows => windows::configure(ctx).await,
        }
    }

    /// Builds `configuration` and installs it into the staging directory.
    pub async fn build_and_install<R: ToolRunner>(
        self,
        ctx: &BuildContext<'_, R>,
        configuration: BuildConfiguration,
    ) -> Result<()> {
        match self {
            Self::Linux => linux::build_and_install(ctx, configuration).await,
            Self::MacOs => macos::build_and_install(ctx, configuration).await,
            Self::Windows => windows::build_and_install(ctx, configuration).await,
        }
    }

    /// Tidies the staging tree once every configuration is installed.
    pub async fn finish_install(self, settings: &Settings) -> Result<()> {
        match self {
            Self::MacOs => macos::finish_install(settings).await,
            Self::Linux | Self::Windows => Ok(()),
        }
    }

    /// Compresses the staging tree into `{basename}.{extension}` under the
    /// source root and returns the archive path.
    pub async fn compress<R: ToolRunner>(
        self,
        settings: &Settings,
        runner: &R,
        basename: &str,
    ) -> Result<PathBuf> {
        match self {
            Self::Linux => linux::compress(settings, runner, basename).await,
            Self::MacOs => macos::compress(settings, runner, basename).await,
            Self::Windows => windows::compress(settings, basename).await,
        }
    }
}

impl fmt::Display for PlatformTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// CMake build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildConfiguration {
    Release,
    Debug,
}

impl BuildConfiguration {
    /// Every configuration, in build order.
    pub const ALL: [BuildConfiguration; 2] = [Self::Release, Self::Debug];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Release => "Release",
            Self::Debug => "Debug",
        }
    }
}

impl fmt::Display for BuildConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a build step needs, threaded explicitly through the pipeline.
pub struct BuildContext<'a, R> {
    pub settings: &'a Settings,
    pub runner: &'a R,
    pub timestamp: &'a Timestamp,
    pub revision: &'a str,
}

impl<R> BuildContext<'_, R> {
    /// Definitions passed to every configure step.
    ///
    /// Marks the build as packaged, forwards the docs/apps switches and bakes
    /// the build metadata into the compiled artifacts.
    pub fn configure_flags(&self) -> Vec<String> {
        let options = self.settings.options();
        vec![
            "-DNAP_PACKAGED_BUILD=1".to_string(),
            format!("-DINCLUDE_DOCS={}", u8::from(options.include_docs)),
            format!("-DPACKAGE_NAIVI_APPS={}", u8::from(options.include_apps)),
            format!("-DNAP_BUILD_TIMESTAMP={}", self.timestamp),
            format!("-DNAP_BUILD_GIT_REVISION={}", self.revision),
            format!(
                "-DCMAKE_INSTALL_PREFIX={}",
                self.settings.staging_path().display()
            ),
        ]
    }

    /// Job count as a command line value.
    pub fn jobs(&self) -> String {
        self.settings.jobs().to_string()
    }
}
