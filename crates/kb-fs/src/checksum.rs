//! Content digests for change detection
//!
//! Provides a single canonical digest format (`sha256:<hex>`) used to
//! fingerprint source files. Digests are compared for equality only; they
//! are not a security boundary.

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Prefix for all digests produced by this module
const PREFIX: &str = "sha256:";

/// Fixed-length content digest in the form `sha256:<64 hex chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// The digest as its canonical string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the string has the canonical `sha256:<hex>` shape.
    ///
    /// Deserialized digests are not validated; a malformed one simply never
    /// matches a freshly computed digest.
    pub fn is_well_formed(&self) -> bool {
        self.0
            .strip_prefix(PREFIX)
            .is_some_and(|hex| hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Digest {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Compute the digest of raw content.
pub fn digest(content: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(content);
    Digest(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Compute the digest of string content.
pub fn digest_str(content: &str) -> Digest {
    digest(content.as_bytes())
}
