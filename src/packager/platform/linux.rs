//! Linux: apt provisioning, Makefile builds, `.tar.xz` archives.

use super::{BuildConfiguration, BuildContext};
use crate::packager::{
    archive::compress_in_place,
    error::{Context, Result},
    provision,
    settings::Settings,
    tool::{ToolCommand, ToolRunner},
};
use std::path::PathBuf;

/// stderr text `dpkg --get-selections` prints for unknown packages.
const DPKG_MISSING_MARKER: &str = "no packages";

fn dpkg_query(settings: &Settings, package: &str) -> ToolCommand {
    ToolCommand::new("dpkg")
        .args(["--get-selections", package])
        .current_dir(settings.root())
}

/// Whether apt reports `package` as installed.
pub async fn is_package_installed<R: ToolRunner>(settings: &Settings, runner: &R, package: &str) -> bool {
    provision::check_installed(
        runner,
        dpkg_query(settings, package),
        package,
        DPKG_MISSING_MARKER,
    )
    .await
}

/// Installs `packages` in a single apt transaction.
///
/// A failed install is fatal.
pub async fn install_missing<R: ToolRunner>(settings: &Settings, runner: &R, packages: &[String]) -> Result<()> {
    if packages.is_empty() {
        log::info!("All dependencies already installed");
        return Ok(());
    }

    log::info!("Installing packages via apt: {}", packages.join(" "));
    runner
        .run(
            &ToolCommand::new("sudo")
                .args(["apt-get", "--assume-yes", "install"])
                .args(packages)
                .current_dir(settings.root()),
        )
        .await?;
    Ok(())
}

/// Checks every configured dependency and installs the missing ones.
///
/// Already-installed packages are never passed to apt, so no `sudo` prompt
/// appears when nothing is missing.
pub async fn provision<R: ToolRunner>(settings: &Settings, runner: &R) -> Result<()> {
    let missing = provision::missing_packages(
        runner,
        &settings.dependencies().linux,
        DPKG_MISSING_MARKER,
        |package| dpkg_query(settings, package),
    )
    .await;

    install_missing(settings, runner, &missing).await
}

/// Generates a Makefile build directory for one configuration.
pub async fn configure<R: ToolRunner>(
    ctx: &BuildContext<'_, R>,
    configuration: Option<BuildConfiguration>,
) -> Result<()> {
    let configuration =
        configuration.context("Makefile builds are configured per build configuration")?;

    let command = ToolCommand::new("cmake")
        .arg("-H.")
        .arg(format!(
            "-B{}",
            ctx.settings.build_dir_name(Some(configuration))
        ))
        .arg(format!("-DCMAKE_BUILD_TYPE={configuration}"))
        .args(ctx.configure_flags())
        .current_dir(ctx.settings.root());

    ctx.runner.run(&command).await?;
    Ok(())
}

/// Builds and installs one configuration with `make`.
pub async fn build_and_install<R: ToolRunner>(
    ctx: &BuildContext<'_, R>,
    configuration: BuildConfiguration,
) -> Result<()> {
    let command = ToolCommand::new("make")
        .args(["all", "install"])
        .arg(format!("-j{}", ctx.jobs()))
        .current_dir(ctx.settings.build_path(Some(configuration)));

    ctx.runner.run(&command).await?;
    Ok(())
}

/// Creates `{basename}.tar.xz` with `tar`.
pub async fn compress<R: ToolRunner>(settings: &Settings, runner: &R, basename: &str) -> Result<PathBuf> {
    compress_in_place(settings, runner, basename, "tar.xz", |archive, dir| {
        ToolCommand::new("tar").args(["-cJvf", archive, dir])
    })
    .await
}
