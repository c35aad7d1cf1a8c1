//! Optional TOML settings file.
//!
//! ```toml
//! product_name = "NAP"
//! staging_dir = "packaging"
//! jobs = 8
//!
//! [dependencies]
//! linux = ["cmake", "build-essential"]
//!
//! [generators]
//! windows = "Visual Studio 16 2019"
//! ```

use crate::packager::error::{Error, ErrorExt, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Values read from a settings file. Absent keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsFile {
    pub product_name: Option<String>,
    pub build_dir: Option<String>,
    pub staging_dir: Option<PathBuf>,
    pub archiving_dir: Option<PathBuf>,
    pub build_info_file: Option<PathBuf>,
    pub packaged_build_info_file: Option<PathBuf>,
    pub clean_dirs: Option<Vec<PathBuf>>,
    pub jobs: Option<usize>,
    pub dependencies: Option<DependencyTable>,
    pub generators: Option<GeneratorTable>,
    pub windows_flags: Option<Vec<String>>,
}

/// `[dependencies]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyTable {
    pub linux: Option<Vec<String>>,
    pub macos: Option<Vec<String>>,
}

/// `[generators]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorTable {
    pub macos: Option<String>,
    pub windows: Option<String>,
}

impl SettingsFile {
    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).fs_context("reading settings file", path)?;
        Self::parse(path, &contents)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
