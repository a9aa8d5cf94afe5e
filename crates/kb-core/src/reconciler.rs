//! Snapshot reconciliation
//!
//! The [`Reconciler`] compares the fingerprints of the files currently on
//! disk with the fingerprint set stored in the last snapshot and reloads the
//! knowledge base when they differ.
//!
//! Each call moves through these phases, traced at debug level:
//!
//! ```text
//! Unchecked -> CheckedFresh
//!           -> CheckedStale -> Reloading -> Reloaded
//!                                        -> ReloadFailed
//! ```
//!
//! A reload is built completely in memory before anything is written, so a
//! failure at any point leaves the previously persisted snapshot in place.

use std::path::Path;

use kb_fs::{FileProvider, LocalFs, RobustnessConfig};

use crate::config::LoaderConfig;
use crate::fingerprint::{self, FingerprintDiff, FingerprintSet};
use crate::ingest::{self, KnowledgeBase};
use crate::layout::SourceLayout;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unchecked,
    CheckedFresh,
    CheckedStale,
    Reloading,
    Reloaded,
    ReloadFailed,
}

/// Why a persisted snapshot cannot be used as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// Nothing persisted, or the stored file was unusable
    NoSnapshot,
    /// The stored snapshot is not a completed load
    NotLoaded,
    /// The stored snapshot carries no fingerprint set
    NoFingerprints,
    /// Files were added, modified or removed
    Changed,
}

impl std::fmt::Display for Staleness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSnapshot => write!(f, "no usable snapshot"),
            Self::NotLoaded => write!(f, "snapshot is not loaded"),
            Self::NoFingerprints => write!(f, "snapshot has no fingerprints"),
            Self::Changed => write!(f, "source files changed"),
        }
    }
}

/// Classify `persisted` against the current fingerprints.
///
/// Returns `None` when the snapshot is current.
pub fn staleness(current: &FingerprintSet, persisted: Option<&Snapshot>) -> Option<Staleness> {
    let Some(snapshot) = persisted else {
        return Some(Staleness::NoSnapshot);
    };
    if !snapshot.is_loaded() {
        return Some(Staleness::NotLoaded);
    }
    let Some(stored) = snapshot.fingerprints() else {
        return Some(Staleness::NoFingerprints);
    };
    if current != stored {
        return Some(Staleness::Changed);
    }
    None
}

/// Whether the knowledge base must be reloaded.
///
/// True when there is no usable snapshot, or when any file was added,
/// modified or deleted since it was written.
pub fn needs_reload(current: &FingerprintSet, persisted: Option<&Snapshot>) -> bool {
    staleness(current, persisted).is_some()
}

/// A freshly built snapshot and the model it summarises.
#[derive(Debug, Clone)]
pub struct Reloaded {
    pub snapshot: Snapshot,
    pub knowledge: KnowledgeBase,
}

/// Outcome of [`Reconciler::check_and_reload_if_stale`].
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// The snapshot now in effect
    pub snapshot: Snapshot,
    pub reloaded: bool,
    /// Why a reload happened, if it did
    pub staleness: Option<Staleness>,
    /// Changes relative to the previous snapshot's fingerprints
    pub changes: FingerprintDiff,
    /// The reloaded model, present only when `reloaded` is true
    pub knowledge: Option<KnowledgeBase>,
}

/// Orchestrates discovery, fingerprinting, comparison and persistence.
pub struct Reconciler<P: FileProvider = LocalFs> {
    layout: SourceLayout,
    store: SnapshotStore,
    fs: P,
}

impl Reconciler<LocalFs> {
    /// Open the knowledge base rooted at `repo_root` on the local filesystem,
    /// reading `.knowledge.toml` if present.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the configuration or the
    /// repository root is invalid.
    pub fn open(repo_root: &Path) -> Result<Self> {
        let config = LoaderConfig::load(repo_root)?;
        Self::with_provider(repo_root, &config, LocalFs)
    }
}

impl<P: FileProvider> Reconciler<P> {
    /// Build a reconciler over an explicit configuration and provider.
    pub fn with_provider(repo_root: &Path, config: &LoaderConfig, fs: P) -> Result<Self> {
        let layout = SourceLayout::resolve(repo_root, config)?;
        let store = SnapshotStore::new(layout.snapshot_path().clone());
        Ok(Self { layout, store, fs })
    }

    /// Override lock and fsync behaviour of snapshot writes.
    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.store = self.store.with_robustness(robustness);
        self
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Fingerprint every file under the configured roots.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Scan`] naming every unreadable file, or
    /// [`crate::Error::Config`] for an invalid root. A failed scan is never
    /// reported as "up to date".
    pub fn compute_current_fingerprints(&self) -> Result<FingerprintSet> {
        let discovery = self.layout.discover(&self.fs)?;
        fingerprint::compute(&discovery.files, &self.fs)
    }

    /// Re-ingest everything and build a new snapshot without writing it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Ingest`] if any required file cannot be read
    /// or parsed. No partial snapshot is ever produced.
    pub fn reload(&self) -> Result<Reloaded> {
        let discovery = self.layout.discover(&self.fs)?;
        let ingested = ingest::ingest(&self.layout, &discovery, &self.fs)?;
        let snapshot = Snapshot::loaded(&self.layout, &ingested.knowledge, ingested.fingerprints);
        tracing::info!(
            docs = snapshot.counts.core_docs_count,
            cards = snapshot.counts.knowledge_cards_count,
            categories = snapshot.counts.categories_count,
            "knowledge base reloaded"
        );
        Ok(Reloaded {
            snapshot,
            knowledge: ingested.knowledge,
        })
    }

    /// Replace the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Persistence`] if the snapshot cannot be written.
    pub fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        self.store.save(snapshot)
    }

    /// The last persisted snapshot, or `None` if absent or unusable.
    pub fn load_persisted(&self) -> Option<Snapshot> {
        self.store.load()
    }

    /// The persisted snapshot, or a `not_loaded` placeholder.
    pub fn status(&self) -> Snapshot {
        self.load_persisted()
            .unwrap_or_else(|| Snapshot::not_loaded(&self.layout))
    }

    /// Reload and persist unconditionally.
    pub fn load(&self) -> Result<Reloaded> {
        let reloaded = self.reload()?;
        self.persist(&reloaded.snapshot)?;
        Ok(reloaded)
    }

    /// Reload and persist only if the persisted snapshot is stale.
    ///
    /// This is the entry point for update checks.
    pub fn check_and_reload_if_stale(&self) -> Result<Reconciliation> {
        let mut phase = Phase::Unchecked;
        let persisted = self.load_persisted();
        let current = self.compute_current_fingerprints()?;

        let changes = match persisted.as_ref().and_then(Snapshot::fingerprints) {
            Some(stored) => current.diff(stored),
            None => current.diff(&FingerprintSet::new()),
        };

        let staleness = staleness(&current, persisted.as_ref());
        let persisted = match (staleness, persisted) {
            (None, Some(snapshot)) => {
                transition(&mut phase, Phase::CheckedFresh);
                return Ok(Reconciliation {
                    snapshot,
                    reloaded: false,
                    staleness: None,
                    changes,
                    knowledge: None,
                });
            }
            (_, persisted) => persisted,
        };

        transition(&mut phase, Phase::CheckedStale);
        tracing::debug!(
            reason = ?staleness,
            added = changes.added.len(),
            modified = changes.modified.len(),
            removed = changes.removed.len(),
            "snapshot is stale"
        );

        transition(&mut phase, Phase::Reloading);
        match self.load() {
            Ok(reloaded) => {
                transition(&mut phase, Phase::Reloaded);
                Ok(Reconciliation {
                    snapshot: reloaded.snapshot,
                    reloaded: true,
                    staleness,
                    changes,
                    knowledge: Some(reloaded.knowledge),
                })
            }
            Err(e) => {
                transition(&mut phase, Phase::ReloadFailed);
                tracing::warn!(
                    error = %e,
                    kept_previous = persisted.is_some(),
                    "reload failed, previous snapshot remains authoritative"
                );
                Err(e)
            }
        }
    }
}

fn transition(phase: &mut Phase, next: Phase) {
    tracing::debug!(from = ?*phase, to = ?next, "reconcile phase");
    *phase = next;
}
