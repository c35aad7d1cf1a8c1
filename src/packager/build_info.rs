//! Persisted build-info record.
//!
//! The working-tree file (default `cmake/buildInfo.json`) carries the
//! externally managed `version` and the `buildNumber` bumped once per run.
//! Revision and timestamp are only ever written into the packaged copy that
//! ships inside the release, so the working tree stays free of per-build
//! churn.

use super::{
    error::{Error, ErrorExt, Result},
    timestamp::Timestamp,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

/// Build metadata for one release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildInfo {
    /// Release version, owned by whoever edits the file.
    pub version: String,

    #[serde(rename = "buildNumber", default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<u64>,

    #[serde(rename = "gitRevision", default, skip_serializing_if = "Option::is_none")]
    pub git_revision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Keys this tool does not know about, preserved on rewrite.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl BuildInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            build_number: None,
            git_revision: None,
            timestamp: None,
            extra: BTreeMap::new(),
        }
    }

    /// Current build number, absent counting as 0.
    pub fn build_number(&self) -> u64 {
        self.build_number.unwrap_or(0)
    }
}

/// Reads and writes the build-info record.
#[derive(Debug, Clone)]
pub struct BuildInfoStore {
    source: PathBuf,
    packaged: PathBuf,
}

impl BuildInfoStore {
    /// `source` is the working-tree record, `packaged` the copy stamped into
    /// the release.
    pub fn new(source: impl Into<PathBuf>, packaged: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            packaged: packaged.into(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source
    }

    pub fn packaged_path(&self) -> &Path {
        &self.packaged
    }

    /// Loads the working-tree record.
    pub async fn load(&self) -> Result<BuildInfo> {
        let contents = match tokio::fs::read_to_string(&self.source).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::MissingBuildInfo {
                    path: self.source.clone(),
                });
            }
            Err(e) => return Err(e).fs_context("reading build info", &self.source),
        };

        parse_record(&self.source, &contents)
    }

    /// Bumps the build number and writes the record back to the source file.
    pub async fn increment_and_persist(&self, info: BuildInfo) -> Result<BuildInfo> {
        let previous = info.build_number();
        let bumped = previous
            .checked_add(1)
            .ok_or_else(|| Error::MalformedBuildInfo {
                path: self.source.clone(),
                reason: format!("buildNumber {previous} cannot be incremented"),
            })?;
        let next = BuildInfo {
            build_number: Some(bumped),
            git_revision: None,
            timestamp: None,
            ..info
        };

        write_record(&self.source, &next).await?;
        log::info!(
            "Build number {} -> {} ({})",
            previous,
            bumped,
            self.source.display()
        );

        Ok(next)
    }

    /// Writes a copy of `info` carrying `revision` and `timestamp` to the
    /// packaged location and returns it.
    pub async fn stamp(&self, info: &BuildInfo, revision: &str, timestamp: &Timestamp) -> Result<BuildInfo> {
        let stamped = BuildInfo {
            git_revision: Some(revision.to_string()),
            timestamp: Some(timestamp.to_string()),
            ..info.clone()
        };

        if let Some(parent) = self.packaged.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating packaged build info directory", parent)?;
        }
        write_record(&self.packaged, &stamped).await?;
        log::debug!("Stamped build info into {}", self.packaged.display());

        Ok(stamped)
    }
}

fn parse_record(path: &Path, contents: &str) -> Result<BuildInfo> {
    let malformed = |reason: String| Error::MalformedBuildInfo {
        path: path.to_path_buf(),
        reason,
    };

    let value: Value = serde_json::from_str(contents).map_err(|e| malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(malformed("expected a JSON object".to_string()));
    }
    if !value.get("version").is_some_and(Value::is_string) {
        return Err(Error::MissingField {
            path: path.to_path_buf(),
            field: "version",
        });
    }

    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}

/// Serializes with sorted keys and two-space indentation.
fn render_record(info: &BuildInfo) -> Result<String> {
    // serde_json's default Map is ordered by key.
    let value = serde_json::to_value(info).map_err(|e| Error::GenericError(e.to_string()))?;
    let mut rendered =
        serde_json::to_string_pretty(&value).map_err(|e| Error::GenericError(e.to_string()))?;
    rendered.push('\n');
    Ok(rendered)
}

async fn write_record(path: &Path, info: &BuildInfo) -> Result<()> {
    let rendered = render_record(info)?;
    tokio::fs::write(path, rendered)
        .await
        .fs_context("writing build info", path)
}
