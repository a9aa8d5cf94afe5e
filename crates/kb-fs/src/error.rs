//! Error types for kb-fs

use std::path::PathBuf;

/// Result type for kb-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in kb-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    /// Classify an I/O error against the path it occurred on.
    ///
    /// `NotFound` and `PermissionDenied` get their own variants so callers
    /// can tell a missing file from an unreadable one.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// The path this error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. }
            | Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::ConfigParse { path, .. }
            | Self::ConfigSerialize { path, .. }
            | Self::LockFailed { path } => Some(path),
            Self::UnsupportedFormat { .. } => None,
        }
    }
}
