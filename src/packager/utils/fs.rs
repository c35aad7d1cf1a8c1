//! File system utilities for packaging.
//!
//! Idempotent directory management, symlink-preserving copies and the
//! renames the archivers rely on.

use crate::packager::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
///
/// Returns whether anything was removed.
pub async fn remove_dir_all(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Renames `from` to `to`.
pub async fn rename(from: &Path, to: &Path) -> Result<()> {
    log::debug!("Moving {} -> {}", from.display(), to.display());
    fs::rename(from, to)
        .await
        .fs_context(&format!("moving to {}", to.display()), from)
}

/// Fails with [`Error::ArtifactExists`] if something already lives at `path`.
pub async fn ensure_absent(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path).await {
        Ok(_) => Err(Error::ArtifactExists {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("checking artifact path", path),
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Recursively copies a directory, preserving symlinks.
///
/// Fails if the source is not a directory or the destination already exists.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} is not a directory",
            from.display()
        )));
    }
    ensure_absent(to).await?;

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || -> Result<()> {
        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let dest_path = to.join(entry.path().strip_prefix(&from)?);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("reading symlink", entry.path())?;
                let linked = if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)
                } else {
                    symlink_file(&target, &dest_path)
                };
                linked.fs_context("creating symlink", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path).fs_context("copying file", &dest_path)?;
            }
        }
        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Deletes every regular file called `name` below `dir`.
///
/// Returns the removed paths.
pub async fn remove_files_named(dir: &Path, name: &str) -> Result<Vec<PathBuf>> {
    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in walkdir::WalkDir::new(dir).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == name {
            matches.push(entry.into_path());
        }
    }

    for path in &matches {
        fs::remove_file(path)
            .await
            .fs_context("removing file", path)?;
    }

    Ok(matches)
}

/// Total size in bytes of a file or directory tree.
pub fn disk_usage(path: &Path) -> Result<u64> {
    let mut total = 0;
    for entry in walkdir::WalkDir::new(path).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn remove_dir_all_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("buildDebug");

        assert!(!remove_dir_all(&dir).await.unwrap());
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        assert!(remove_dir_all(&dir).await.unwrap());
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn copy_dir_refuses_existing_destination() {
        let temp = tempfile::tempdir().unwrap();
        let from = temp.path().join("from");
        let to = temp.path().join("to");
        std::fs::create_dir_all(from.join("lib")).unwrap();
        std::fs::write(from.join("lib/core.txt"), "core").unwrap();

        copy_dir(&from, &to).await.unwrap();
        assert_eq!(std::fs::read_to_string(to.join("lib/core.txt")).unwrap(), "core");

        let err = copy_dir(&from, &to).await.unwrap_err();
        assert!(matches!(err, Error::ArtifactExists { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn copy_dir_preserves_symlinks() {
        let temp = tempfile::tempdir().unwrap();
        let from = temp.path().join("from");
        let to = temp.path().join("to");
        std::fs::create_dir_all(&from).unwrap();
        std::fs::write(from.join("libnap.so.1"), "so").unwrap();
        std::os::unix::fs::symlink("libnap.so.1", from.join("libnap.so")).unwrap();

        copy_dir(&from, &to).await.unwrap();

        let link = to.join("libnap.so");
        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(std::fs::read_link(&link).unwrap(), PathBuf::from("libnap.so.1"));
    }

    #[tokio::test]
    async fn remove_files_named_reports_unreadable_trees() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("packaging");

        let err = remove_files_named(&missing, ".DS_Store").await.unwrap_err();
        assert!(matches!(err, Error::Walk(_)));
    }

    #[tokio::test]
    async fn remove_files_named_only_touches_matching_files() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("bin/.DS_Store.d")).unwrap();
        std::fs::write(temp.path().join(".DS_Store"), "finder").unwrap();
        std::fs::write(temp.path().join("bin/.DS_Store"), "finder").unwrap();
        std::fs::write(temp.path().join("bin/napkin"), "exe").unwrap();

        let removed = remove_files_named(temp.path(), ".DS_Store").await.unwrap();

        assert_eq!(removed.len(), 2);
        assert!(temp.path().join("bin/napkin").is_file());
        assert!(temp.path().join("bin/.DS_Store.d").is_dir());
    }
}
