//! Source layout resolution and discovery
//!
//! Resolves the configured roots against a repository root and enumerates
//! the source files under them through a [`FileProvider`]. Fingerprinting
//! and ingestion both consume the same [`Discovery`], so they always agree
//! on which files make up the knowledge base.

use std::path::{Path, PathBuf};

use kb_fs::{FileProvider, NormalizedPath};

use crate::config::LoaderConfig;
use crate::{Error, Result};

/// What a discovered source file is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// A core markdown document
    Document,
    /// A knowledge card in the named category
    Card { category: String },
    /// A schema of the named kind
    Schema { kind: String },
}

/// A source file found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub kind: SourceKind,
    pub path: PathBuf,
}

/// A directory selected by extension, resolved to an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoot {
    pub dir: PathBuf,
    pub extension: String,
}

/// Result of one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Every source file, documents first, then cards, then schemas
    pub files: Vec<SourceFile>,
    /// Every card category directory, including empty ones
    pub categories: Vec<String>,
}

/// The configured roots resolved against a repository root.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    repo_root: PathBuf,
    kb_path: PathBuf,
    documents: ResolvedRoot,
    cards: ResolvedRoot,
    schemas: Vec<(String, ResolvedRoot)>,
    manifest: PathBuf,
    api_signatures: Option<PathBuf>,
    documentation: Vec<PathBuf>,
    snapshot_path: NormalizedPath,
}

impl SourceLayout {
    /// Resolve `config` against `repo_root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the repository root does not exist or is
    /// not a directory.
    pub fn resolve(repo_root: &Path, config: &LoaderConfig) -> Result<Self> {
        if !repo_root.is_dir() {
            return Err(Error::config(
                repo_root,
                "repository root does not exist or is not a directory",
            ));
        }
        let repo_root = kb_fs::identity_key(repo_root);
        let repo_root = PathBuf::from(repo_root);
        let kb_path = repo_root.join(&config.kb_dir);

        Ok(Self {
            documents: ResolvedRoot {
                dir: kb_path.join(&config.documents.dir),
                extension: config.documents.extension.clone(),
            },
            cards: ResolvedRoot {
                dir: kb_path.join(&config.cards.dir),
                extension: config.cards.extension.clone(),
            },
            schemas: config
                .schemas
                .iter()
                .map(|s| {
                    let root = ResolvedRoot {
                        dir: repo_root.join(&s.dir),
                        extension: s.extension.clone(),
                    };
                    (s.kind.clone(), root)
                })
                .collect(),
            manifest: kb_path.join(&config.manifest),
            api_signatures: config.api_signatures.as_ref().map(|p| repo_root.join(p)),
            documentation: config.documentation.iter().map(|p| repo_root.join(p)).collect(),
            snapshot_path: NormalizedPath::new(
                repo_root.join(&config.cache_dir).join(&config.status_file),
            ),
            kb_path,
            repo_root,
        })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn kb_path(&self) -> &Path {
        &self.kb_path
    }

    pub fn documents(&self) -> &ResolvedRoot {
        &self.documents
    }

    pub fn cards(&self) -> &ResolvedRoot {
        &self.cards
    }

    /// Schema roots in configuration order, keyed by kind.
    pub fn schemas(&self) -> &[(String, ResolvedRoot)] {
        &self.schemas
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    pub fn api_signatures(&self) -> Option<&Path> {
        self.api_signatures.as_deref()
    }

    pub fn documentation(&self) -> &[PathBuf] {
        &self.documentation
    }

    /// Where the snapshot is persisted.
    pub fn snapshot_path(&self) -> &NormalizedPath {
        &self.snapshot_path
    }

    /// Enumerate every source file under the configured roots.
    ///
    /// Missing roots are skipped. A root that exists but is not a directory
    /// fails the whole pass with [`Error::Config`].
    pub fn discover(&self, fs: &dyn FileProvider) -> Result<Discovery> {
        let mut discovery = Discovery::default();

        if usable(fs, &self.documents.dir)? {
            for path in fs.list_files(&self.documents.dir, &self.documents.extension)? {
                discovery.files.push(SourceFile {
                    kind: SourceKind::Document,
                    path,
                });
            }
        }

        if usable(fs, &self.cards.dir)? {
            for category_dir in fs.list_dirs(&self.cards.dir)? {
                let Some(category) = category_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                else {
                    continue;
                };
                for path in fs.list_files(&category_dir, &self.cards.extension)? {
                    discovery.files.push(SourceFile {
                        kind: SourceKind::Card {
                            category: category.clone(),
                        },
                        path,
                    });
                }
                discovery.categories.push(category);
            }
        }

        for (kind, root) in &self.schemas {
            if usable(fs, &root.dir)? {
                for path in fs.list_files(&root.dir, &root.extension)? {
                    discovery.files.push(SourceFile {
                        kind: SourceKind::Schema { kind: kind.clone() },
                        path,
                    });
                }
            }
        }

        tracing::debug!(
            files = discovery.files.len(),
            categories = discovery.categories.len(),
            "discovered knowledge sources"
        );
        Ok(discovery)
    }
}

/// Whether a root should be scanned: present and a directory.
fn usable(fs: &dyn FileProvider, dir: &Path) -> Result<bool> {
    if !fs.exists(dir)? {
        tracing::debug!(dir = %dir.display(), "source root missing, skipping");
        return Ok(false);
    }
    if !fs.is_dir(dir)? {
        return Err(Error::config(dir, "configured source root is not a directory"));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_fs::LocalFs;
    use std::fs;
    use tempfile::tempdir;

    fn layout(root: &Path) -> SourceLayout {
        SourceLayout::resolve(root, &LoaderConfig::default()).unwrap()
    }

    #[test]
    fn resolve_rejects_missing_root() {
        let dir = tempdir().unwrap();
        let err = SourceLayout::resolve(&dir.path().join("nope"), &LoaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn resolve_places_snapshot_in_cache_dir() {
        let dir = tempdir().unwrap();
        let layout = layout(dir.path());
        assert!(
            layout
                .snapshot_path()
                .as_str()
                .ends_with(".knowledge_cache/loader_status.json")
        );
        assert!(layout.kb_path().ends_with("knowledge_base/.agent_kb"));
    }

    #[test]
    fn discover_on_empty_repo_finds_nothing() {
        let dir = tempdir().unwrap();
        let discovery = layout(dir.path()).discover(&LocalFs).unwrap();
        assert_eq!(discovery, Discovery::default());
    }

    #[test]
    fn discover_collects_all_kinds_and_empty_categories() {
        let dir = tempdir().unwrap();
        let kb = dir.path().join("knowledge_base/.agent_kb");
        fs::create_dir_all(kb.join("core_docs")).unwrap();
        fs::create_dir_all(kb.join("knowledge_cards/physics")).unwrap();
        fs::create_dir_all(kb.join("knowledge_cards/empty")).unwrap();
        fs::create_dir_all(dir.path().join("schemas/agents")).unwrap();
        fs::write(kb.join("core_docs/a.md"), "a").unwrap();
        fs::write(kb.join("core_docs/ignored.txt"), "x").unwrap();
        fs::write(kb.join("knowledge_cards/physics/gravity.yaml"), "k: v").unwrap();
        fs::write(dir.path().join("schemas/agents/tutor.json"), "{}").unwrap();

        let discovery = layout(dir.path()).discover(&LocalFs).unwrap();
        let kinds: Vec<_> = discovery.files.iter().map(|f| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                SourceKind::Document,
                SourceKind::Card {
                    category: "physics".into()
                },
                SourceKind::Schema {
                    kind: "agents".into()
                },
            ]
        );
        assert_eq!(discovery.categories, vec!["empty", "physics"]);
    }

    #[test]
    fn root_that_is_a_file_is_config_error() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("schemas")).unwrap();
        fs::write(dir.path().join("schemas/agents"), "not a dir").unwrap();

        let err = layout(dir.path()).discover(&LocalFs).unwrap_err();
        match err {
            Error::Config { path, .. } => assert!(path.ends_with("schemas/agents")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }
}
