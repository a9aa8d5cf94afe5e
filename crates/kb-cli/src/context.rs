//! Repository root detection
//!
//! Commands work from anywhere inside a repository, git-style: the root is
//! the nearest ancestor holding a loader config or a knowledge base directory.

use std::path::{Path, PathBuf};

use kb_fs::KbPath;

/// Markers that identify a repository root
const MARKERS: [KbPath; 2] = [KbPath::ConfigFile, KbPath::KnowledgeBaseDir];

/// Walk up from `cwd` looking for a repository root.
///
/// Returns `None` if no ancestor carries a marker.
pub fn detect_root(cwd: &Path) -> Option<PathBuf> {
    cwd.ancestors()
        .find(|dir| MARKERS.iter().any(|m| dir.join(m.as_str()).exists()))
        .map(Path::to_path_buf)
}

/// Pick the repository root: an explicit path wins, then detection, then `cwd`.
pub fn resolve_root(explicit: Option<PathBuf>, cwd: &Path) -> PathBuf {
    if let Some(root) = explicit {
        return root;
    }
    match detect_root(cwd) {
        Some(root) => {
            tracing::debug!(root = %root.display(), "detected repository root");
            root
        }
        None => cwd.to_path_buf(),
    }
}
