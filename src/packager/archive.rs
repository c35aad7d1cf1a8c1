//! Turns the staging directory into the release artifact.
//!
//! The artifact is either a copy of the staging tree under the release name
//! or a platform archive of it. Archivers that shell out work on the tree
//! renamed to the release name, so the archive's top-level folder carries that
//! name, then move it back to the staging path for inspection.

use super::{
    build_info::BuildInfo,
    checksum::calculate_sha256,
    error::Result,
    platform::PlatformTarget,
    settings::Settings,
    timestamp::Timestamp,
    tool::{ToolCommand, ToolRunner},
    utils::fs,
};
use path_absolutize::Absolutize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Shape of a produced artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Timestamped copy of the staging directory.
    Directory,
    /// Compressed archive file.
    Archive,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => f.write_str("directory"),
            Self::Archive => f.write_str("archive"),
        }
    }
}

/// The release produced by a packaging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageArtifact {
    path: PathBuf,
    kind: ArtifactKind,
    size: u64,
    checksum: String,
}

impl PackageArtifact {
    /// Records size and checksum of the artifact at `path`.
    pub async fn inspect(path: &Path, kind: ArtifactKind) -> Result<Self> {
        let path = path.absolutize()?.into_owned();
        let size = fs::disk_usage(&path)?;
        let checksum = calculate_sha256(&path).await?;

        Ok(Self {
            path,
            kind,
            size,
            checksum,
        })
    }

    /// Absolute path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Size in bytes; the sum of all files for directory artifacts.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Hex-encoded SHA-256.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// File or directory name of the artifact.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Packages the staging directory of `settings` for `platform`.
///
/// `build_info` must be the record re-read after the build number was
/// persisted; its version names the artifact.
pub async fn archive<R: ToolRunner>(
    settings: &Settings,
    runner: &R,
    platform: PlatformTarget,
    build_info: &BuildInfo,
    timestamp: &Timestamp,
    zip: bool,
) -> Result<PackageArtifact> {
    let basename =
        settings.artifact_basename(&build_info.version, platform, timestamp.as_str());
    let package_dir = settings.root().join(&basename);

    let (path, kind) = if zip {
        let archive_path = settings
            .root()
            .join(format!("{}.{}", basename, platform.archive_extension()));
        fs::ensure_absent(&archive_path).await?;
        fs::ensure_absent(&package_dir).await?;

        log::info!("Archiving to {}..", archive_path.display());
        let produced = platform.compress(settings, runner, &basename).await?;
        (produced, ArtifactKind::Archive)
    } else {
        fs::copy_dir(&settings.staging_path(), &package_dir).await?;
        (package_dir, ArtifactKind::Directory)
    };

    let artifact = PackageArtifact::inspect(&path, kind).await?;
    log::info!(
        "✓ Created {} {} ({} bytes, sha256 {})",
        artifact.kind(),
        artifact.file_name(),
        artifact.size(),
        artifact.checksum()
    );

    Ok(artifact)
}

/// Compresses the staging tree with an external archiver.
///
/// Moves staging to `basename` under the root, runs the command produced by
/// `command` for `(archive file name, directory name)` from the root, then
/// moves the tree back. A failing archiver leaves the renamed tree in place.
pub(crate) async fn compress_in_place<R, F>(
    settings: &Settings,
    runner: &R,
    basename: &str,
    extension: &str,
    command: F,
) -> Result<PathBuf>
where
    R: ToolRunner,
    F: FnOnce(&str, &str) -> ToolCommand,
{
    let staging = settings.staging_path();
    let package_dir = settings.root().join(basename);
    let archive_name = format!("{basename}.{extension}");

    fs::rename(&staging, &package_dir).await?;
    runner
        .run(&command(&archive_name, basename).current_dir(settings.root()))
        .await?;
    fs::rename(&package_dir, &staging).await?;

    Ok(settings.root().join(archive_name))
}
