//! Windows: Visual Studio builds and in-process `.zip` archives.

use super::{BuildConfiguration, BuildContext};
use crate::packager::{
    error::{Context, Error, ErrorExt, Result},
    settings::Settings,
    tool::{ToolCommand, ToolRunner},
    utils::fs,
};
use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Dependencies ship with the source tree on Windows.
pub async fn provision<R: ToolRunner>(_settings: &Settings, _runner: &R) -> Result<()> {
    log::debug!("No dependency provisioning on Windows");
    Ok(())
}

/// Generates the Visual Studio solution shared by every configuration.
pub async fn configure<R: ToolRunner>(ctx: &BuildContext<'_, R>) -> Result<()> {
    fs::create_dir_all(&ctx.settings.build_path(None), false).await?;

    let command = ToolCommand::new("cmake")
        .arg("-H.")
        .arg(format!("-B{}", ctx.settings.build_dir_name(None)))
        .args(["-G", ctx.settings.generators().windows.as_str()])
        .args(ctx.settings.windows_flags())
        .args(ctx.configure_flags())
        .current_dir(ctx.settings.root());

    ctx.runner.run(&command).await?;
    Ok(())
}

/// Builds the `install` target of one configuration through `cmake --build`.
pub async fn build_and_install<R: ToolRunner>(
    ctx: &BuildContext<'_, R>,
    configuration: BuildConfiguration,
) -> Result<()> {
    let command = ToolCommand::new("cmake")
        .args(["--build", ctx.settings.build_dir_name(None).as_str()])
        .args(["--target", "install"])
        .args(["--config", configuration.as_str()])
        .arg("--parallel")
        .arg(ctx.jobs())
        .current_dir(ctx.settings.root());

    ctx.runner.run(&command).await?;
    Ok(())
}

/// Creates `{basename}.zip` with a single `{basename}/` folder at its top.
///
/// The staging tree is nested inside the archiving directory so the zip is
/// rooted one level above it. The staging directory is restored and the
/// archiving directory removed whether or not zipping succeeded, and a
/// partial archive is deleted when zipping fails.
///
/// Unlike the zip failure, a failed restore returns at once and leaves the
/// tree inside the archiving directory, which is then not removed.
pub async fn compress(settings: &Settings, basename: &str) -> Result<PathBuf> {
    let staging = settings.staging_path();
    let archiving = settings.archiving_path();
    let nested = archiving.join(basename);
    let archive_path = settings.root().join(format!("{basename}.zip"));

    fs::create_dir_all(&archiving, true).await?;
    fs::rename(&staging, &nested).await?;

    let source = archiving.clone();
    let destination = archive_path.clone();
    let zipped = tokio::task::spawn_blocking(move || zip_dir(&source, &destination))
        .await
        .map_err(|e| Error::GenericError(format!("Zip task panicked: {}", e)))
        .and_then(|result| result);

    fs::rename(&nested, &staging).await?;
    fs::remove_dir_all(&archiving).await?;

    if let Err(e) = zipped {
        remove_partial_archive(&archive_path).await;
        return Err(e);
    }
    Ok(archive_path)
}

/// Writes every entry below `dir` into a new zip at `destination`, with
/// names relative to `dir`.
fn zip_dir(dir: &Path, destination: &Path) -> Result<()> {
    let file = File::create(destination).fs_context("creating zip archive", destination)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in walkdir::WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(dir)?;
        let name = archive_name(relative).with_context(|| {
            format!("Path is not valid UTF-8: {}", entry.path().display())
        })?;

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut input = File::open(entry.path()).fs_context("reading file to zip", entry.path())?;
            io::copy(&mut input, &mut writer).fs_context("writing zip entry", entry.path())?;
        }
    }

    writer
        .finish()?
        .into_inner()
        .map_err(|e| e.into_error())
        .fs_context("writing zip archive", destination)?;
    Ok(())
}

/// Deletes a half-written archive so the release name stays free.
async fn remove_partial_archive(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => log::debug!("Removed partial archive {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove partial archive {}: {}", path.display(), e),
    }
}

/// Zip entry name: components joined with `/` whatever the host separator.
fn archive_name(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}
