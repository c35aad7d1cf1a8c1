//! SHA-256 checksums of packaged artifacts.
//!
//! Archives hash as a single file. Directory artifacts hash every regular
//! file's relative path and contents in sorted path order, so the same tree
//! always yields the same digest.

use super::error::{Error, ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Hex-encoded SHA-256 of a file or directory tree.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || hash_path(&path))
        .await
        .map_err(|e| Error::GenericError(format!("Checksum task panicked: {}", e)))?
}

fn hash_path(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).fs_context("reading artifact metadata", path)?;
    let mut hasher = Sha256::new();

    if metadata.is_file() {
        hash_file_into(&mut hasher, path)?;
    } else if metadata.is_dir() {
        let mut files: Vec<PathBuf> = Vec::new();
        for entry in walkdir::WalkDir::new(path).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();

        for file in files {
            let relative = file.strip_prefix(path)?;
            hasher.update(relative.to_string_lossy().as_bytes());
            hash_file_into(&mut hasher, &file)?;
        }
    } else {
        return Err(Error::GenericError(format!(
            "Path is neither file nor directory: {}",
            path.display()
        )));
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_file_into(hasher: &mut Sha256, path: &Path) -> Result<()> {
    let mut file = std::fs::File::open(path).fs_context("opening file for hashing", path)?;
    std::io::copy(&mut file, hasher).fs_context("hashing file", path)?;
    Ok(())
}
