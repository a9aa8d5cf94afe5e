//! Well-known names in a knowledge base repository.

use std::path::Path;

/// Standard knowledge base filesystem markers and paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KbPath {
    /// The `knowledge_base` directory (marks a repository root)
    KnowledgeBaseDir,
    /// The knowledge base content root, relative to the repository root
    AgentKbDir,
    /// The `.knowledge_cache` directory holding the persisted snapshot
    CacheDir,
    /// The persisted snapshot file name inside the cache directory
    StatusFile,
    /// The optional loader configuration file at the repository root
    ConfigFile,
    /// The activation script written by `setup`
    ActivationScript,
}

impl KbPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KnowledgeBaseDir => "knowledge_base",
            Self::AgentKbDir => "knowledge_base/.agent_kb",
            Self::CacheDir => ".knowledge_cache",
            Self::StatusFile => "loader_status.json",
            Self::ConfigFile => ".knowledge.toml",
            Self::ActivationScript => ".activate_knowledge.sh",
        }
    }
}

impl AsRef<Path> for KbPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for KbPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for KbPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
