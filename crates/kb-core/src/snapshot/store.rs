//! Durable storage for the snapshot record

use kb_fs::{ConfigStore, NormalizedPath, RobustnessConfig, io};

use super::{FORMAT_VERSION, Snapshot};
use crate::{Error, Result};

/// Reads and atomically replaces the snapshot file.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: NormalizedPath,
    robustness: RobustnessConfig,
}

impl SnapshotStore {
    pub fn new(path: NormalizedPath) -> Self {
        Self {
            path,
            robustness: RobustnessConfig::default(),
        }
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Read the stored snapshot strictly.
    ///
    /// Returns `Ok(None)` when no snapshot has been written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptSnapshot`] if the file cannot be read, does
    /// not parse, or has a different format version.
    pub fn read(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let corrupt = |message: String| Error::CorruptSnapshot {
            path: self.path.to_native(),
            message,
        };

        let content = io::read_text(&self.path).map_err(|e| corrupt(e.to_string()))?;
        let snapshot: Snapshot =
            ConfigStore::parse(&self.path, &content).map_err(|e| corrupt(e.to_string()))?;

        if snapshot.format_version != FORMAT_VERSION {
            return Err(corrupt(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                snapshot.format_version
            )));
        }
        Ok(Some(snapshot))
    }

    /// Read the stored snapshot, treating an unusable one as absent.
    pub fn load(&self) -> Option<Snapshot> {
        match self.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unusable snapshot");
                None
            }
        }
    }

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the file cannot be written; the
    /// previous snapshot is left untouched.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        ConfigStore::with_robustness(self.robustness)
            .save(&self.path, snapshot)
            .map_err(|source| Error::Persistence {
                path: self.path.to_native(),
                source,
            })?;
        tracing::info!(path = %self.path, "snapshot persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoaderConfig;
    use crate::layout::SourceLayout;
    use std::fs;

    fn store_in(dir: &std::path::Path) -> (SourceLayout, SnapshotStore) {
        let layout = SourceLayout::resolve(dir, &LoaderConfig::default()).unwrap();
        let store = SnapshotStore::new(layout.snapshot_path().clone());
        (layout, store)
    }

    #[test]
    fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let (_, store) = store_in(dir.path());
        assert!(store.read().unwrap().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn garbage_is_corrupt_and_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let (_, store) = store_in(dir.path());
        fs::create_dir_all(store.path().parent().unwrap().to_native()).unwrap();
        fs::write(store.path().to_native(), "{ truncated").unwrap();

        assert!(matches!(store.read(), Err(Error::CorruptSnapshot { .. })));
        assert!(store.load().is_none());
    }

    #[test]
    fn future_format_version_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let (layout, store) = store_in(dir.path());
        let mut snapshot = Snapshot::not_loaded(&layout);
        snapshot.format_version = FORMAT_VERSION + 1;
        store.save(&snapshot).unwrap();

        let err = store.read().unwrap_err();
        assert!(err.to_string().contains("unsupported format version"));
        assert!(store.load().is_none());
    }

    #[test]
    fn legacy_untyped_status_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let (_, store) = store_in(dir.path());
        fs::create_dir_all(store.path().parent().unwrap().to_native()).unwrap();
        fs::write(
            store.path().to_native(),
            r#"{"status": "loaded", "version": "1.0.0", "core_docs_count": 2, "file_hashes": {}}"#,
        )
        .unwrap();

        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let (layout, store) = store_in(dir.path());
        let snapshot = Snapshot::not_loaded(&layout);

        store.save(&snapshot).unwrap();
        assert_eq!(store.read().unwrap(), Some(snapshot));
    }
}
