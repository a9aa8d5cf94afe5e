//! Content ingestion into the in-memory knowledge model
//!
//! Each source file is read exactly once. The same bytes are digested for
//! the fingerprint set and parsed for the model, which keeps a snapshot's
//! fingerprints and counts describing the same content.
//!
//! Documents, cards and schemas are required: any read or parse failure
//! aborts ingestion with every failing path listed. The manifest, API
//! signatures and documentation are auxiliary and are skipped with a
//! warning when they cannot be loaded.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use kb_fs::{Digest, FileProvider, digest, identity_key};
use serde::Serialize;

use crate::error::FileFailure;
use crate::fingerprint::FingerprintSet;
use crate::layout::{Discovery, SourceKind, SourceLayout};
use crate::snapshot::SummaryCounts;
use crate::{Error, Result};

/// A core document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoreDoc {
    pub content: String,
    /// Length in characters
    pub size: usize,
    pub digest: Digest,
}

/// A parsed knowledge card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub content: serde_yaml::Value,
    pub file: String,
}

/// Everything loaded from one ingestion pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeBase {
    /// Core documents keyed by file name
    pub core_docs: BTreeMap<String, CoreDoc>,
    /// Cards keyed by category, then by file stem
    pub cards: BTreeMap<String, BTreeMap<String, Card>>,
    /// Schemas keyed by kind, then by file stem
    pub schemas: BTreeMap<String, BTreeMap<String, serde_json::Value>>,
    pub manifest: Option<serde_json::Value>,
    pub api_signatures: Option<String>,
    /// Documentation keyed by file name
    pub documentation: BTreeMap<String, String>,
    pub loaded_at: DateTime<Utc>,
}

impl KnowledgeBase {
    /// Summary counts for the snapshot.
    pub fn counts(&self) -> SummaryCounts {
        SummaryCounts {
            core_docs_count: self.core_docs.len(),
            knowledge_cards_count: self.cards.values().map(BTreeMap::len).sum(),
            categories_count: self.cards.len(),
            schema_counts: self
                .schemas
                .iter()
                .map(|(kind, schemas)| (kind.clone(), schemas.len()))
                .collect(),
        }
    }

    /// Card count per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        self.cards
            .iter()
            .map(|(category, cards)| (category.clone(), cards.len()))
            .collect()
    }

    /// Documents plus cards.
    pub fn total_items(&self) -> usize {
        self.core_docs.len() + self.cards.values().map(BTreeMap::len).sum::<usize>()
    }
}

/// The model together with the fingerprints of the bytes it was built from.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub knowledge: KnowledgeBase,
    pub fingerprints: FingerprintSet,
}

/// Read and parse every discovered file plus the auxiliary artifacts.
///
/// # Errors
///
/// Returns [`Error::Ingest`] listing every required file that could not be
/// read or parsed. Nothing is returned partially.
pub fn ingest(layout: &SourceLayout, discovery: &Discovery, fs: &dyn FileProvider) -> Result<Ingested> {
    let mut knowledge = KnowledgeBase {
        core_docs: BTreeMap::new(),
        cards: discovery
            .categories
            .iter()
            .map(|c| (c.clone(), BTreeMap::new()))
            .collect(),
        schemas: layout
            .schemas()
            .iter()
            .map(|(kind, _)| (kind.clone(), BTreeMap::new()))
            .collect(),
        manifest: None,
        api_signatures: None,
        documentation: BTreeMap::new(),
        loaded_at: Utc::now(),
    };
    let mut fingerprints = Vec::with_capacity(discovery.files.len());
    let mut failures = Vec::new();

    for file in &discovery.files {
        let bytes = match fs.read(&file.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                failures.push(FileFailure::new(&file.path, e.to_string()));
                continue;
            }
        };
        let file_digest = digest(&bytes);

        let parsed = match &file.kind {
            SourceKind::Document => parse_document(&file.path, bytes, file_digest.clone())
                .map(|(name, doc)| {
                    knowledge.core_docs.insert(name, doc);
                }),
            SourceKind::Card { category } => parse_card(&file.path, &bytes).map(|(stem, card)| {
                knowledge
                    .cards
                    .entry(category.clone())
                    .or_default()
                    .insert(stem, card);
            }),
            SourceKind::Schema { kind } => parse_schema(&file.path, &bytes).map(|(stem, value)| {
                knowledge
                    .schemas
                    .entry(kind.clone())
                    .or_default()
                    .insert(stem, value);
            }),
        };

        match parsed {
            Ok(()) => fingerprints.push((identity_key(&file.path), file_digest)),
            Err(message) => failures.push(FileFailure::new(&file.path, message)),
        }
    }

    if !failures.is_empty() {
        tracing::warn!(failed = failures.len(), "ingestion failed");
        return Err(Error::Ingest { failures });
    }

    load_auxiliary(layout, fs, &mut knowledge);

    Ok(Ingested {
        knowledge,
        fingerprints: fingerprints.into_iter().collect(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn parse_document(
    path: &Path,
    bytes: Vec<u8>,
    digest: Digest,
) -> std::result::Result<(String, CoreDoc), String> {
    let content = String::from_utf8(bytes).map_err(|e| format!("not valid UTF-8: {e}"))?;
    let doc = CoreDoc {
        size: content.chars().count(),
        content,
        digest,
    };
    Ok((file_name(path), doc))
}

fn parse_card(path: &Path, bytes: &[u8]) -> std::result::Result<(String, Card), String> {
    let content: serde_yaml::Value =
        serde_yaml::from_slice(bytes).map_err(|e| format!("invalid YAML: {e}"))?;
    let card = Card {
        content,
        file: path.display().to_string(),
    };
    Ok((file_stem(path), card))
}

fn parse_schema(
    path: &Path,
    bytes: &[u8],
) -> std::result::Result<(String, serde_json::Value), String> {
    let value = serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {e}"))?;
    Ok((file_stem(path), value))
}

/// Optional artifacts; failures are logged and skipped.
fn load_auxiliary(layout: &SourceLayout, fs: &dyn FileProvider, knowledge: &mut KnowledgeBase) {
    let manifest = layout.manifest();
    if present(fs, manifest) {
        match fs.read(manifest).map_err(|e| e.to_string()).and_then(|bytes| {
            serde_json::from_slice::<serde_json::Value>(&bytes).map_err(|e| e.to_string())
        }) {
            Ok(value) => knowledge.manifest = Some(value),
            Err(e) => tracing::warn!(path = %manifest.display(), error = %e, "skipping manifest"),
        }
    }

    if let Some(path) = layout.api_signatures() {
        knowledge.api_signatures = read_optional_text(fs, path);
    }

    for path in layout.documentation() {
        if let Some(text) = read_optional_text(fs, path) {
            knowledge.documentation.insert(file_name(path), text);
        }
    }
}

/// Whether an optional artifact is there to read; an unknown answer is
/// logged and treated as absent.
fn present(fs: &dyn FileProvider, path: &Path) -> bool {
    fs.exists(path).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "cannot stat auxiliary file, skipping");
        false
    })
}

fn read_optional_text(fs: &dyn FileProvider, path: &Path) -> Option<String> {
    if !present(fs, path) {
        return None;
    }
    let text = fs
        .read(path)
        .map_err(|e| e.to_string())
        .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));
    match text {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping auxiliary file");
            None
        }
    }
}
