//! Error types for kb-core

use std::fmt;
use std::path::PathBuf;

/// Result type for kb-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single source file that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// The offending file
    pub path: PathBuf,
    /// What went wrong
    pub message: String,
}

impl FileFailure {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Join failures for display, one per line.
fn list(failures: &[FileFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("\n  - {f}"))
        .collect::<String>()
}

/// Errors that can occur in kb-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured root or the loader configuration itself is invalid
    #[error("Invalid configuration at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// One or more source files could not be read while fingerprinting
    #[error("Could not fingerprint {} file(s):{}", .failures.len(), list(.failures))]
    Scan { failures: Vec<FileFailure> },

    /// One or more source files could not be read or parsed during reload
    #[error("Reload aborted, {} file(s) failed:{}", .failures.len(), list(.failures))]
    Ingest { failures: Vec<FileFailure> },

    /// The new snapshot could not be written; the previous one stays authoritative
    #[error("Failed to persist snapshot to {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: kb_fs::Error,
    },

    /// The persisted snapshot exists but cannot be used
    #[error("Corrupt snapshot at {path}: {message}")]
    CorruptSnapshot { path: PathBuf, message: String },

    /// Activation script or shell profile could not be written
    #[error("Failed to write activation file {path}: {source}")]
    Activation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error from kb-fs
    #[error(transparent)]
    Fs(#[from] kb_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Per-file failures carried by this error, if any.
    pub fn failures(&self) -> &[FileFailure] {
        match self {
            Self::Scan { failures } | Self::Ingest { failures } => failures,
            _ => &[],
        }
    }
}
