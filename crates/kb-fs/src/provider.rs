//! Filesystem provider abstraction
//!
//! The loader never touches `std::fs` directly for source content; it goes
//! through a [`FileProvider`] so discovery and reads can be substituted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Directory listing and file reads used by discovery and ingestion.
pub trait FileProvider {
    /// Files directly inside `dir` whose extension is exactly `extension`
    /// (without the leading dot), sorted by path.
    ///
    /// The match is case-sensitive; `a.YAML` is not a `yaml` file.
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>>;

    /// Immediate subdirectories of `dir`, sorted by path.
    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Full byte content of a file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Whether anything exists at `path`.
    ///
    /// # Errors
    ///
    /// Fails when existence cannot be determined, e.g. a parent directory
    /// denies traversal. Absence is `Ok(false)`.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Whether `path` is a directory. Absence is `Ok(false)`.
    fn is_dir(&self, path: &Path) -> Result<bool>;
}

/// [`FileProvider`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }

    fn entries(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }
}

impl FileProvider for LocalFs {
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        Ok(Self::entries(dir)?
            .into_iter()
            .filter(|p| p.is_file())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e == extension)
            })
            .collect())
    }

    fn list_dirs(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(Self::entries(dir)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect())
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| Error::io(path, e))
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        path.try_exists().map_err(|e| Error::io(path, e))
    }

    fn is_dir(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(path, e)),
        }
    }
}
