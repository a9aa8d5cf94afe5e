//! Fingerprint sets and their comparison
//!
//! A [`FingerprintSet`] maps each source file's identity key to the digest
//! of its content. Sets are built in one pass and never patched; comparison
//! is map equality, so discovery order is irrelevant.

use std::collections::BTreeMap;

use kb_fs::{Digest, FileProvider, digest, identity_key};
use serde::{Deserialize, Serialize};

use crate::error::FileFailure;
use crate::layout::SourceFile;
use crate::{Error, Result};

/// Identity key to content digest for every ingested source file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintSet(BTreeMap<String, Digest>);

impl FingerprintSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Digest> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Entries sorted by identity key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Digest)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// What changed going from `previous` to `self`.
    pub fn diff(&self, previous: &FingerprintSet) -> FingerprintDiff {
        let mut diff = FingerprintDiff::default();
        for (key, digest) in &self.0 {
            match previous.0.get(key) {
                None => diff.added.push(key.clone()),
                Some(old) if old != digest => diff.modified.push(key.clone()),
                Some(_) => {}
            }
        }
        diff.removed = previous
            .0
            .keys()
            .filter(|key| !self.0.contains_key(*key))
            .cloned()
            .collect();
        diff
    }
}

/// Later entries overwrite earlier ones with the same key.
impl FromIterator<(String, Digest)> for FingerprintSet {
    fn from_iter<I: IntoIterator<Item = (String, Digest)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Keys added, modified or removed between two fingerprint sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintDiff {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub removed: Vec<String>,
}

impl FingerprintDiff {
    /// True when the two sets were equal.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Total number of changed keys.
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }
}

/// Fingerprint every file in `files`.
///
/// Read failures are collected rather than short-circuiting, so the error
/// names every unreadable file.
///
/// # Errors
///
/// Returns [`Error::Scan`] if any file could not be read.
pub fn compute(files: &[SourceFile], fs: &dyn FileProvider) -> Result<FingerprintSet> {
    let mut entries = Vec::with_capacity(files.len());
    let mut failures = Vec::new();

    for file in files {
        match fs.read(&file.path) {
            Ok(content) => entries.push((identity_key(&file.path), digest(&content))),
            Err(e) => failures.push(FileFailure::new(&file.path, e.to_string())),
        }
    }

    if !failures.is_empty() {
        return Err(Error::Scan { failures });
    }
    Ok(entries.into_iter().collect())
}
