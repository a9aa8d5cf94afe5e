//! [`TestKnowledgeBase`] builder for loader test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Documents directory relative to the root, matching the default layout.
pub const DOCS_DIR: &str = "knowledge_base/.agent_kb/core_docs";
/// Cards directory relative to the root, matching the default layout.
pub const CARDS_DIR: &str = "knowledge_base/.agent_kb/knowledge_cards";
/// Schema root relative to the root, matching the default layout.
pub const SCHEMAS_DIR: &str = "schemas";

/// A temporary repository laid out the way the loader expects by default.
///
/// # Example
///
/// ```rust,no_run
/// use kb_test_utils::TestKnowledgeBase;
///
/// let kb = TestKnowledgeBase::new();
/// kb.write_doc("a.md", "hello");
/// kb.write_card("patterns", "retry", "title: Retry\n");
/// kb.write_schema("agents", "planner", r#"{"type": "object"}"#);
/// ```
pub struct TestKnowledgeBase {
    temp_dir: TempDir,
}

impl Default for TestKnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

impl TestKnowledgeBase {
    /// Create an empty temporary repository.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a repository holding two documents, one card and one schema
    /// of each default kind.
    pub fn populated() -> Self {
        let kb = Self::new();
        kb.write_doc("a.md", "hello");
        kb.write_doc("b.md", "world");
        kb.write_card("patterns", "retry", "title: Retry\ntags: [resilience]\n");
        kb.write_schema("agents", "planner", r#"{"type": "object"}"#);
        kb.write_schema("entities", "user", r#"{"type": "object", "required": ["id"]}"#);
        kb
    }

    /// Root path of the temporary repository.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the repository.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a core document.
    pub fn write_doc(&self, name: &str, content: &str) -> PathBuf {
        self.write_file(&format!("{DOCS_DIR}/{name}"), content)
    }

    /// Write a card as `<category>/<name>.yaml`.
    pub fn write_card(&self, category: &str, name: &str, content: &str) -> PathBuf {
        self.write_file(&format!("{CARDS_DIR}/{category}/{name}.yaml"), content)
    }

    /// Create an empty category directory.
    pub fn add_category(&self, category: &str) -> PathBuf {
        let path = self.path(&format!("{CARDS_DIR}/{category}"));
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Write a schema as `schemas/<kind>/<name>.json`.
    pub fn write_schema(&self, kind: &str, name: &str, content: &str) -> PathBuf {
        self.write_file(&format!("{SCHEMAS_DIR}/{kind}/{name}.json"), content)
    }

    /// Write `.knowledge.toml`.
    pub fn write_config(&self, content: &str) -> PathBuf {
        self.write_file(".knowledge.toml", content)
    }

    /// Delete a file relative to the root.
    pub fn remove(&self, relative: &str) {
        fs::remove_file(self.path(relative)).unwrap();
    }

    /// Delete a core document.
    pub fn remove_doc(&self, name: &str) {
        self.remove(&format!("{DOCS_DIR}/{name}"));
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `relative` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
