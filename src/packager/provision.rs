//! Package-manager queries shared by the Linux and macOS provisioners.
//!
//! A query that cannot be answered counts as "not installed": the manager
//! missing, a non-zero exit and the manager's own not-installed message all
//! lead to an install attempt rather than a failed run. That also means a
//! broken package manager is indistinguishable from an absent package here;
//! the install step is where such errors surface.

use super::tool::{ToolCommand, ToolRunner};

/// Runs `query` and decides whether `package` is installed.
///
/// `missing_marker` is the text the package manager prints on stderr for an
/// unknown package.
pub async fn check_installed<R: ToolRunner>(
    runner: &R,
    query: ToolCommand,
    package: &str,
    missing_marker: &str,
) -> bool {
    let installed = match runner.run(&query.capture_output()).await {
        Ok(output) => !output.stderr.contains(missing_marker),
        Err(e) => {
            log::debug!("Query for '{}' failed, treating as missing: {}", package, e);
            let stderr = e.stderr().trim();
            if !stderr.is_empty() {
                log::debug!("{}", stderr);
            }
            false
        }
    };
    log::info!("Package '{}' installed? {}", package, installed);
    installed
}

/// Filters `packages` down to the ones `query` reports as missing.
pub async fn missing_packages<R, F>(
    runner: &R,
    packages: &[String],
    missing_marker: &str,
    query: F,
) -> Vec<String>
where
    R: ToolRunner,
    F: Fn(&str) -> ToolCommand,
{
    let mut missing = Vec::new();
    for package in packages {
        if !check_installed(runner, query(package), package, missing_marker).await {
            missing.push(package.clone());
        }
    }
    missing
}
