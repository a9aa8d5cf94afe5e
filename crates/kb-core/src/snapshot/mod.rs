//! The persisted snapshot record
//!
//! A snapshot summarises the last successful load together with the
//! fingerprint set that produced it. It is always replaced wholesale.
//! Unknown fields, missing fields or a different `format_version` make a
//! stored snapshot unusable, which the reconciler treats as stale.

mod store;

pub use store::SnapshotStore;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::FingerprintSet;
use crate::ingest::KnowledgeBase;
use crate::layout::SourceLayout;

/// Current on-disk snapshot format.
pub const FORMAT_VERSION: u32 = 1;

/// Whether the snapshot describes a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Loaded,
    NotLoaded,
}

impl std::fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::NotLoaded => write!(f, "not_loaded"),
        }
    }
}

/// Counts of what a load ingested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryCounts {
    pub core_docs_count: usize,
    pub knowledge_cards_count: usize,
    pub categories_count: usize,
    /// Schema kind to number of schemas
    pub schema_counts: BTreeMap<String, usize>,
}

impl SummaryCounts {
    /// Count for one schema kind, zero if the kind is unknown.
    pub fn schema_count(&self, kind: &str) -> usize {
        self.schema_counts.get(kind).copied().unwrap_or(0)
    }
}

/// Persisted summary of the last successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub format_version: u32,
    pub status: SnapshotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<DateTime<Utc>>,
    pub counts: SummaryCounts,
    /// Category name to card count
    pub categories: BTreeMap<String, usize>,
    /// Fingerprints of the exact files ingested; absent means "unknown"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_hashes: Option<FingerprintSet>,
    pub repo_root: String,
    pub kb_path: String,
}

impl Snapshot {
    /// Placeholder used when nothing has been persisted yet.
    pub fn not_loaded(layout: &SourceLayout) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            status: SnapshotStatus::NotLoaded,
            loaded_at: None,
            counts: SummaryCounts::default(),
            categories: BTreeMap::new(),
            file_hashes: None,
            repo_root: layout.repo_root().display().to_string(),
            kb_path: layout.kb_path().display().to_string(),
        }
    }

    /// Build the snapshot for a completed load.
    pub fn loaded(layout: &SourceLayout, knowledge: &KnowledgeBase, fingerprints: FingerprintSet) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            status: SnapshotStatus::Loaded,
            loaded_at: Some(knowledge.loaded_at),
            counts: knowledge.counts(),
            categories: knowledge.category_counts(),
            file_hashes: Some(fingerprints),
            repo_root: layout.repo_root().display().to_string(),
            kb_path: layout.kb_path().display().to_string(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.status == SnapshotStatus::Loaded
    }

    /// The stored fingerprint set, if any.
    pub fn fingerprints(&self) -> Option<&FingerprintSet> {
        self.file_hashes.as_ref()
    }
}
