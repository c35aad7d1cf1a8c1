//! macOS: Homebrew provisioning, Xcode builds, `.zip` archives.

use super::{BuildConfiguration, BuildContext};
use crate::packager::{
    archive::compress_in_place,
    error::Result,
    provision,
    settings::Settings,
    tool::{ToolCommand, ToolRunner},
    utils::fs,
};
use std::path::PathBuf;

/// stderr text `brew list` prints for formulae that are not installed.
const BREW_MISSING_MARKER: &str = "No such keg";

/// Finder metadata removed from the staging tree before archiving.
const FINDER_METADATA: &str = ".DS_Store";

fn brew_list(settings: &Settings, package: &str) -> ToolCommand {
    ToolCommand::new("brew")
        .args(["list", package])
        .current_dir(settings.root())
}

/// Whether Homebrew reports `package` as installed.
pub async fn is_package_installed<R: ToolRunner>(settings: &Settings, runner: &R, package: &str) -> bool {
    provision::check_installed(
        runner,
        brew_list(settings, package),
        package,
        BREW_MISSING_MARKER,
    )
    .await
}

/// Installs `packages` one by one.
///
/// A formula that fails to install is logged and skipped; the rest are
/// still attempted.
pub async fn install_missing<R: ToolRunner>(settings: &Settings, runner: &R, packages: &[String]) {
    if packages.is_empty() {
        log::info!("All dependencies already installed");
        return;
    }

    for package in packages {
        let command = ToolCommand::new("brew")
            .args(["install", package.as_str()])
            .current_dir(settings.root());
        match runner.run(&command).await {
            Ok(_) => log::info!("Installed {} via homebrew", package),
            Err(e) => log::warn!("Failed installing {} via homebrew: {}", package, e),
        }
    }
}

/// Installs missing Homebrew formulae.
///
/// Without Homebrew on `PATH` provisioning is skipped with a warning.
pub async fn provision<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<()> {
    if runner.locate("brew").is_none() {
        log::warn!("Not installing macOS dependencies as homebrew was not found");
        return Ok(());
    }

    let missing = provision::missing_packages(
        runner,
        &settings.dependencies().macos,
        BREW_MISSING_MARKER,
        |package| brew_list(settings, package),
    )
    .await;

    install_missing(settings, runner, &missing).await;
    Ok(())
}

/// Generates the Xcode project shared by every configuration.
pub async fn configure<R: ToolRunner>(ctx: &BuildContext<'_, R>) -> Result<()> {
    let command = ToolCommand::new("cmake")
        .arg("-H.")
        .arg(format!("-B{}", ctx.settings.build_dir_name(None)))
        .args(["-G", ctx.settings.generators().macos.as_str()])
        .args(ctx.configure_flags())
        .current_dir(ctx.settings.root());

    ctx.runner.run(&command).await?;
    Ok(())
}

/// Builds the `install` target of one configuration with `xcodebuild`.
pub async fn build_and_install<R: ToolRunner>(
    ctx: &BuildContext<'_, R>,
    configuration: BuildConfiguration,
) -> Result<()> {
    let command = ToolCommand::new("xcodebuild")
        .args(["-configuration", configuration.as_str()])
        .args(["-target", "install"])
        .arg("-jobs")
        .arg(ctx.jobs())
        .current_dir(ctx.settings.build_path(None));

    ctx.runner.run(&command).await?;
    Ok(())
}

/// Strips Finder metadata from the staging tree.
pub async fn finish_install(settings: &Settings) -> Result<()> {
    let removed = fs::remove_files_named(&settings.staging_path(), FINDER_METADATA).await?;
    if !removed.is_empty() {
        log::debug!("Removed {} {} files", removed.len(), FINDER_METADATA);
    }
    Ok(())
}

/// Creates `{basename}.zip` with `zip`, keeping symlinks as links.
pub async fn compress<R: ToolRunner>(settings: &Settings, runner: &R, basename: &str) -> Result<PathBuf> {
    compress_in_place(settings, runner, basename, "zip", |archive, dir| {
        ToolCommand::new("zip").args(["-yr", archive, dir])
    })
    .await
}
