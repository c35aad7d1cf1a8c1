//! Command line argument parsing and validation.

use crate::{
    error::{CliError, Result},
    packager::{PackageOptions, Settings, SettingsBuilder, SettingsFile},
};
use clap::Parser;
use std::path::PathBuf;

/// Release packager for NAP source trees
#[derive(Parser, Debug)]
#[command(
    name = "nap-release",
    version,
    about = "Builds and packages a NAP release",
    long_about = "Builds a NAP source tree with CMake for every configuration, installs it into
the staging directory and packages it as {Product}-{version}-{platform}-{timestamp}.

The build number in cmake/buildInfo.json is incremented on every run.

Usage:
  nap-release
  nap-release --clean --include-docs
  nap-release --no-zip --root ~/src/nap"
)]
pub struct Args {
    /// Produce a timestamped directory instead of an archive
    #[arg(short = 'z', long = "no-zip", visible_alias = "dont-zip")]
    pub no_zip: bool,

    /// Remove previous build, lib and bin directories before building
    #[arg(short, long)]
    pub clean: bool,

    /// Package the apps as projects
    #[arg(short = 'a', long)]
    pub include_apps: bool,

    /// Include the generated documentation
    #[arg(short = 'd', long)]
    pub include_docs: bool,

    /// Do not check or install host dependencies
    #[arg(long)]
    pub skip_dependencies: bool,

    /// Root of the NAP source tree
    #[arg(short = 'C', long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// TOML settings file; command line flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Parallel jobs handed to the build system (default: processor count)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.jobs == Some(0) {
            return Err("--jobs must be at least 1".to_string());
        }

        match &self.config {
            Some(config) if !config.is_file() => {
                return Err(format!("Settings file not found: {}", config.display()));
            }
            _ => {}
        }

        Ok(())
    }

    /// Switches selected on the command line.
    pub fn options(&self) -> PackageOptions {
        PackageOptions {
            zip: !self.no_zip,
            clean: self.clean,
            include_apps: self.include_apps,
            include_docs: self.include_docs,
            provision: !self.skip_dependencies,
        }
    }

    /// Builds settings from the settings file, then the flags.
    pub fn settings(&self) -> Result<Settings> {
        self.validate()
            .map_err(|reason| CliError::InvalidArguments { reason })?;

        let mut builder = SettingsBuilder::new();
        if let Some(config) = &self.config {
            builder = builder.settings_file(SettingsFile::load(config)?);
        }

        builder = builder.root(&self.root).options(self.options());
        if let Some(jobs) = self.jobs {
            builder = builder.jobs(jobs);
        }

        Ok(builder.build()?)
    }
}
