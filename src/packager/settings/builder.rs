//! Builder for constructing Settings.

use super::{
    DEFAULT_ARCHIVING_DIR, DEFAULT_BUILD_DIR, DEFAULT_BUILD_INFO_FILE, DEFAULT_CLEAN_DIRS,
    DEFAULT_LINUX_DEPENDENCIES, DEFAULT_MACOS_DEPENDENCIES, DEFAULT_MACOS_GENERATOR,
    DEFAULT_PACKAGED_BUILD_INFO_FILE, DEFAULT_PRODUCT_NAME, DEFAULT_STAGING_DIR,
    DEFAULT_WINDOWS_FLAGS, DEFAULT_WINDOWS_GENERATOR, DependencySettings, GeneratorSettings,
    PackageOptions, Settings, SettingsFile,
};
use crate::packager::{
    error::{Error, ErrorExt, Result},
    host::HOST_JOBS,
    platform::BuildConfiguration,
};
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Every field falls back to the packaging defaults, so
/// `SettingsBuilder::new().build()` packages the current directory.
///
/// # Examples
///
/// ```no_run
/// use nap_release::packager::{PackageOptions, SettingsBuilder};
///
/// # fn example() -> nap_release::packager::Result<()> {
/// let settings = SettingsBuilder::new()
///     .root("/src/nap")
///     .options(PackageOptions {
///         zip: false,
///         ..Default::default()
///     })
///     .jobs(8)
///     .build()?;
/// assert_eq!(settings.product_name(), "NAP");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    product_name: Option<String>,
    root: Option<PathBuf>,
    build_dir: Option<String>,
    staging_dir: Option<PathBuf>,
    archiving_dir: Option<PathBuf>,
    build_info_file: Option<PathBuf>,
    packaged_build_info_file: Option<PathBuf>,
    clean_dirs: Option<Vec<PathBuf>>,
    configurations: Option<Vec<BuildConfiguration>>,
    linux_dependencies: Option<Vec<String>>,
    macos_dependencies: Option<Vec<String>>,
    macos_generator: Option<String>,
    windows_generator: Option<String>,
    windows_flags: Option<Vec<String>>,
    options: PackageOptions,
    jobs: Option<usize>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Applies every value present in a settings file.
    pub fn settings_file(mut self, file: SettingsFile) -> Self {
        let SettingsFile {
            product_name,
            build_dir,
            staging_dir,
            archiving_dir,
            build_info_file,
            packaged_build_info_file,
            clean_dirs,
            jobs,
            dependencies,
            generators,
            windows_flags,
        } = file;

        self.product_name = product_name.or(self.product_name);
        self.build_dir = build_dir.or(self.build_dir);
        self.staging_dir = staging_dir.or(self.staging_dir);
        self.archiving_dir = archiving_dir.or(self.archiving_dir);
        self.build_info_file = build_info_file.or(self.build_info_file);
        self.packaged_build_info_file = packaged_build_info_file.or(self.packaged_build_info_file);
        self.clean_dirs = clean_dirs.or(self.clean_dirs);
        self.jobs = jobs.or(self.jobs);
        self.windows_flags = windows_flags.or(self.windows_flags);
        if let Some(dependencies) = dependencies {
            self.linux_dependencies = dependencies.linux.or(self.linux_dependencies);
            self.macos_dependencies = dependencies.macos.or(self.macos_dependencies);
        }
        if let Some(generators) = generators {
            self.macos_generator = generators.macos.or(self.macos_generator);
            self.windows_generator = generators.windows.or(self.windows_generator);
        }
        self
    }

    pub fn product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Sets the source tree root. Relative paths resolve against the
    /// current directory.
    ///
    /// Default: `.`
    pub fn root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.root = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build_dir(mut self, name: impl Into<String>) -> Self {
        self.build_dir = Some(name.into());
        self
    }

    pub fn staging_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.staging_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build_info_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.build_info_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configurations to build.
    ///
    /// Default: Release, then Debug
    pub fn configurations(mut self, configurations: Vec<BuildConfiguration>) -> Self {
        self.configurations = Some(configurations);
        self
    }

    pub fn linux_dependencies(mut self, packages: Vec<String>) -> Self {
        self.linux_dependencies = Some(packages);
        self
    }

    pub fn macos_dependencies(mut self, packages: Vec<String>) -> Self {
        self.macos_dependencies = Some(packages);
        self
    }

    pub fn options(mut self, options: PackageOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the parallel job hint.
    ///
    /// Default: number of logical processors
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Fails if the root cannot be made absolute, the job count is zero or
    /// no configuration is selected.
    pub fn build(self) -> Result<Settings> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = root
            .absolutize()
            .fs_context("resolving source root", &root)?
            .into_owned();

        let jobs = self.jobs.unwrap_or(*HOST_JOBS);
        if jobs == 0 {
            return Err(Error::GenericError("job count must be at least 1".into()));
        }

        let configurations = self
            .configurations
            .unwrap_or_else(|| BuildConfiguration::ALL.to_vec());
        if configurations.is_empty() {
            return Err(Error::GenericError(
                "at least one build configuration is required".into(),
            ));
        }

        let owned = |items: &[&str]| items.iter().map(|item| item.to_string()).collect::<Vec<_>>();

        Ok(Settings::new(
            self.product_name
                .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
            root,
            self.build_dir.unwrap_or_else(|| DEFAULT_BUILD_DIR.to_string()),
            self.staging_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STAGING_DIR)),
            self.archiving_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVING_DIR)),
            self.build_info_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_INFO_FILE)),
            self.packaged_build_info_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PACKAGED_BUILD_INFO_FILE)),
            self.clean_dirs
                .unwrap_or_else(|| DEFAULT_CLEAN_DIRS.iter().map(PathBuf::from).collect()),
            configurations,
            DependencySettings {
                linux: self
                    .linux_dependencies
                    .unwrap_or_else(|| owned(DEFAULT_LINUX_DEPENDENCIES)),
                macos: self
                    .macos_dependencies
                    .unwrap_or_else(|| owned(DEFAULT_MACOS_DEPENDENCIES)),
            },
            GeneratorSettings {
                macos: self
                    .macos_generator
                    .unwrap_or_else(|| DEFAULT_MACOS_GENERATOR.to_string()),
                windows: self
                    .windows_generator
                    .unwrap_or_else(|| DEFAULT_WINDOWS_GENERATOR.to_string()),
            },
            self.windows_flags
                .unwrap_or_else(|| owned(DEFAULT_WINDOWS_FLAGS)),
            self.options,
            jobs,
        ))
    }
}
