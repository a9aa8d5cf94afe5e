//! Loader configuration
//!
//! Every field has a default matching the conventional knowledge base
//! layout, so a repository without a `.knowledge.toml` works out of the box.
//! The file may also be written as JSON or YAML; the format follows the
//! extension.

use std::collections::HashSet;
use std::path::Path;

use kb_fs::{ConfigStore, KbPath, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A directory of source files selected by extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootSpec {
    /// Directory, relative to the knowledge base directory
    pub dir: String,
    /// File extension without the leading dot
    pub extension: String,
}

impl RootSpec {
    fn new(dir: &str, extension: &str) -> Self {
        Self {
            dir: dir.to_string(),
            extension: extension.to_string(),
        }
    }
}

/// A directory of JSON schemas of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRoot {
    /// Schema kind used in summary counts, e.g. `agents`
    pub kind: String,
    /// Directory, relative to the repository root
    pub dir: String,
    /// File extension without the leading dot
    #[serde(default = "default_schema_extension")]
    pub extension: String,
}

fn default_schema_extension() -> String {
    "json".to_string()
}

fn default_documents() -> RootSpec {
    RootSpec::new("core_docs", "md")
}

fn default_cards() -> RootSpec {
    RootSpec::new("knowledge_cards", "yaml")
}

fn default_schemas() -> Vec<SchemaRoot> {
    ["agents", "entities"]
        .into_iter()
        .map(|kind| SchemaRoot {
            kind: kind.to_string(),
            dir: format!("schemas/{kind}"),
            extension: default_schema_extension(),
        })
        .collect()
}

/// Where the loader finds sources and keeps its snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Knowledge base directory, relative to the repository root
    pub kb_dir: String,
    /// Cache directory holding the snapshot, relative to the repository root
    pub cache_dir: String,
    /// Snapshot file name inside `cache_dir`
    pub status_file: String,
    /// Manifest file name inside `kb_dir`
    pub manifest: String,
    /// API signatures document, relative to the repository root
    pub api_signatures: Option<String>,
    /// README-style documentation files, relative to the repository root
    pub documentation: Vec<String>,
    /// Core documents
    pub documents: RootSpec,
    /// Knowledge cards; each immediate subdirectory is a category
    pub cards: RootSpec,
    /// Schema directories
    pub schemas: Vec<SchemaRoot>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            kb_dir: KbPath::AgentKbDir.as_str().to_string(),
            cache_dir: KbPath::CacheDir.as_str().to_string(),
            status_file: KbPath::StatusFile.as_str().to_string(),
            manifest: "_manifest.json".to_string(),
            api_signatures: Some("backend-api-signatures.md".to_string()),
            documentation: vec!["README.md".to_string(), "README_EN.md".to_string()],
            documents: default_documents(),
            cards: default_cards(),
            schemas: default_schemas(),
        }
    }
}

impl LoaderConfig {
    /// Load `<repo_root>/.knowledge.toml` if present, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be parsed or fails
    /// validation.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = NormalizedPath::new(repo_root.join(KbPath::ConfigFile.as_str()));
        if !path.is_file() {
            tracing::debug!(path = %path, "no loader config, using defaults");
            return Ok(Self::default());
        }

        let config: Self = ConfigStore::new()
            .load(&path)
            .map_err(|e| Error::config(path.to_native(), e.to_string()))?;
        config.validate(path.as_ref())?;
        tracing::debug!(path = %path, "loaded loader config");
        Ok(config)
    }

    /// Check the configuration for values that can never describe a root.
    ///
    /// `origin` is reported as the error path.
    pub fn validate(&self, origin: &Path) -> Result<()> {
        let specs = [
            ("documents", &self.documents),
            ("cards", &self.cards),
        ];
        for (name, spec) in specs {
            check_dir(origin, name, &spec.dir)?;
            check_extension(origin, name, &spec.extension)?;
        }

        let mut kinds = HashSet::new();
        for schema in &self.schemas {
            if schema.kind.trim().is_empty() {
                return Err(Error::config(origin, "schema kind must not be empty"));
            }
            if !kinds.insert(schema.kind.as_str()) {
                return Err(Error::config(
                    origin,
                    format!("duplicate schema kind `{}`", schema.kind),
                ));
            }
            check_dir(origin, &schema.kind, &schema.dir)?;
            check_extension(origin, &schema.kind, &schema.extension)?;
        }

        for (name, value) in [
            ("kb_dir", &self.kb_dir),
            ("cache_dir", &self.cache_dir),
            ("status_file", &self.status_file),
        ] {
            check_dir(origin, name, value)?;
        }
        Ok(())
    }
}

fn check_dir(origin: &Path, name: &str, dir: &str) -> Result<()> {
    if dir.trim().is_empty() {
        return Err(Error::config(origin, format!("`{name}` path must not be empty")));
    }
    Ok(())
}

fn check_extension(origin: &Path, name: &str, extension: &str) -> Result<()> {
    if extension.is_empty() || extension.starts_with('.') || extension.contains(['/', '\\']) {
        return Err(Error::config(
            origin,
            format!("`{name}` extension `{extension}` must be a bare extension like `md`"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_conventional_layout() {
        let config = LoaderConfig::default();
        assert_eq!(config.kb_dir, "knowledge_base/.agent_kb");
        assert_eq!(config.documents, RootSpec::new("core_docs", "md"));
        assert_eq!(config.cards, RootSpec::new("knowledge_cards", "yaml"));
        let kinds: Vec<_> = config.schemas.iter().map(|s| s.kind.as_str()).collect();
        assert_eq!(kinds, vec!["agents", "entities"]);
        assert!(config.validate(Path::new("defaults")).is_ok());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(LoaderConfig::load(dir.path()).unwrap(), LoaderConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".knowledge.toml"),
            r#"
kb_dir = "kb"

[documents]
dir = "docs"
extension = "markdown"

[[schemas]]
kind = "agents"
dir = "spec/agents"
"#,
        )
        .unwrap();

        let config = LoaderConfig::load(dir.path()).unwrap();
        assert_eq!(config.kb_dir, "kb");
        assert_eq!(config.documents, RootSpec::new("docs", "markdown"));
        assert_eq!(config.cards, RootSpec::new("knowledge_cards", "yaml"));
        assert_eq!(config.schemas.len(), 1);
        assert_eq!(config.schemas[0].extension, "json");
        assert_eq!(config.cache_dir, ".knowledge_cache");
    }

    #[test]
    fn unparsable_file_is_config_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".knowledge.toml"), "kb_dir = [").unwrap();

        let err = LoaderConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }), "got {err:?}");
    }

    #[test]
    fn dotted_extension_is_rejected() {
        let mut config = LoaderConfig::default();
        config.cards.extension = ".yaml".to_string();
        assert!(matches!(
            config.validate(Path::new("x")),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn duplicate_schema_kind_is_rejected() {
        let mut config = LoaderConfig::default();
        config.schemas[1].kind = "agents".to_string();
        let err = config.validate(Path::new("x")).unwrap_err();
        assert!(err.to_string().contains("duplicate schema kind"));
    }
}
