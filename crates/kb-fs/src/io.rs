//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Tuning for lock acquisition and durability of atomic writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying the advisory lock before giving up.
    pub lock_timeout: Duration,
    /// Flush the temp file to disk before the rename.
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(10),
            enable_fsync: true,
        }
    }
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers never observe a partial file.
/// An exclusive advisory lock on a `<file>.lock` sidecar serializes
/// concurrent writers; acquisition is retried with exponential backoff
/// until `config.lock_timeout` elapses.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let lock_path = sidecar(&native_path, "lock");
    let lock_file = acquire_lock(&lock_path, &native_path, config.lock_timeout)?;

    // Same directory as the target so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let result = write_and_rename(&temp_path, &native_path, content, config.enable_fsync);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    lock_file
        .unlock()
        .map_err(|_| Error::LockFailed { path: native_path.clone() })?;

    result
}

fn write_and_rename(temp_path: &Path, target: &Path, content: &[u8], fsync: bool) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    if fsync {
        temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }
    drop(temp_file);

    fs::rename(temp_path, target).map_err(|e| Error::io(target, e))
}

fn acquire_lock(lock_path: &Path, target: &Path, timeout: Duration) -> Result<File> {
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .map_err(|e| Error::io(lock_path, e))?;

    let policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(10))
        .with_max_interval(Duration::from_millis(200))
        .with_max_elapsed_time(Some(timeout))
        .build();

    backoff::retry(policy, || {
        lock_file
            .try_lock_exclusive()
            .map_err(backoff::Error::transient)
    })
    .map_err(|_| {
        tracing::warn!(path = %target.display(), "timed out waiting for write lock");
        Error::LockFailed {
            path: target.to_path_buf(),
        }
    })?;

    Ok(lock_file)
}

fn sidecar(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Read the full byte content of a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically with default robustness settings.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes(), RobustnessConfig::default())
}
