//! Core Settings struct and implementations.

use crate::packager::platform::{BuildConfiguration, PlatformTarget};
use std::path::{Path, PathBuf};

/// Switches chosen per run, mostly straight from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageOptions {
    /// Compress the staging tree; otherwise copy it to a timestamped directory.
    pub zip: bool,
    /// Remove previous build, lib and bin directories first.
    pub clean: bool,
    /// Package the apps as projects.
    pub include_apps: bool,
    /// Include the generated documentation.
    pub include_docs: bool,
    /// Run the dependency provisioner.
    pub provision: bool,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            zip: true,
            clean: false,
            include_apps: false,
            include_docs: false,
            provision: true,
        }
    }
}

/// Package names handed to the host package manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySettings {
    pub linux: Vec<String>,
    pub macos: Vec<String>,
}

/// CMake generators for the multi-configuration platforms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub macos: String,
    pub windows: String,
}

/// Settings for one packaging run.
///
/// Constructed through [`super::SettingsBuilder`]. All directory settings are
/// relative names resolved against [`Settings::root`], which is absolute.
#[derive(Debug, Clone)]
pub struct Settings {
    product_name: String,
    root: PathBuf,
    build_dir: String,
    staging_dir: PathBuf,
    archiving_dir: PathBuf,
    build_info_file: PathBuf,
    packaged_build_info_file: PathBuf,
    clean_dirs: Vec<PathBuf>,
    configurations: Vec<BuildConfiguration>,
    dependencies: DependencySettings,
    generators: GeneratorSettings,
    windows_flags: Vec<String>,
    options: PackageOptions,
    jobs: usize,
}

impl Settings {
    /// Returns the product name used as artifact prefix.
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Absolute path of the source tree every tool runs from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the build directory, relative to the root.
    ///
    /// Single-configuration generators get one directory per configuration,
    /// suffixed with the configuration name (`buildRelease`).
    pub fn build_dir_name(&self, configuration: Option<BuildConfiguration>) -> String {
        match configuration {
            Some(configuration) => format!("{}{}", self.build_dir, configuration),
            None => self.build_dir.clone(),
        }
    }

    pub fn build_path(&self, configuration: Option<BuildConfiguration>) -> PathBuf {
        self.root.join(self.build_dir_name(configuration))
    }

    /// Staging directory the build system installs into.
    pub fn staging_path(&self) -> PathBuf {
        self.root.join(&self.staging_dir)
    }

    /// Intermediate directory used by the Windows archiver.
    pub fn archiving_path(&self) -> PathBuf {
        self.root.join(&self.archiving_dir)
    }

    /// Working-tree build-info record.
    pub fn build_info_path(&self) -> PathBuf {
        self.root.join(&self.build_info_file)
    }

    /// Build-info copy stamped into the staging tree.
    pub fn packaged_build_info_path(&self) -> PathBuf {
        self.staging_path().join(&self.packaged_build_info_file)
    }

    /// Directories removed by a clean run for `platform`.
    ///
    /// Covers the build directory of every configuration plus the extra
    /// output directories.
    pub fn clean_paths(&self, platform: PlatformTarget) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = if platform.is_multi_config() {
            vec![self.build_path(None)]
        } else {
            self.configurations
                .iter()
                .map(|configuration| self.build_path(Some(*configuration)))
                .collect()
        };
        paths.extend(self.clean_dirs.iter().map(|dir| self.root.join(dir)));
        paths
    }

    /// Configurations built in order.
    pub fn configurations(&self) -> &[BuildConfiguration] {
        &self.configurations
    }

    pub fn dependencies(&self) -> &DependencySettings {
        &self.dependencies
    }

    pub fn generators(&self) -> &GeneratorSettings {
        &self.generators
    }

    /// Extra configure definitions for Windows.
    pub fn windows_flags(&self) -> &[String] {
        &self.windows_flags
    }

    pub fn options(&self) -> PackageOptions {
        self.options
    }

    /// Parallel job hint handed to the build system.
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Artifact name without extension:
    /// `{Product}-{version}-{platform}-{timestamp}`.
    pub fn artifact_basename(&self, version: &str, platform: PlatformTarget, timestamp: &str) -> String {
        format!(
            "{}-{}-{}-{}",
            self.product_name,
            version,
            platform.token(),
            timestamp
        )
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        product_name: String,
        root: PathBuf,
        build_dir: String,
        staging_dir: PathBuf,
        archiving_dir: PathBuf,
        build_info_file: PathBuf,
        packaged_build_info_file: PathBuf,
        clean_dirs: Vec<PathBuf>,
        configurations: Vec<BuildConfiguration>,
        dependencies: DependencySettings,
        generators: GeneratorSettings,
        windows_flags: Vec<String>,
        options: PackageOptions,
        jobs: usize,
    ) -> Self {
        Self {
            product_name,
            root,
            build_dir,
            staging_dir,
            archiving_dir,
            build_info_file,
            packaged_build_info_file,
            clean_dirs,
            configurations,
            dependencies,
            generators,
            windows_flags,
            options,
            jobs,
        }
    }
}
