//! Host introspection.
//!
//! Resolved once per process and handed to the pipeline as plain values.

use std::sync::LazyLock;

/// Logical processor count, used as the default build parallelism hint.
///
/// Cached result to avoid repeated detection.
pub static HOST_JOBS: LazyLock<usize> = LazyLock::new(|| {
    let jobs = num_cpus::get();
    log::debug!("Detected {} logical processors", jobs);
    jobs.max(1)
});
