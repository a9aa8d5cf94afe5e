//! Status command implementation

use std::path::Path;

use colored::Colorize;
use kb_core::{Reconciler, Snapshot};

use crate::error::Result;

/// Run the status command
pub fn run_status(root: &Path, json: bool) -> Result<()> {
    let snapshot = Reconciler::open(root)?.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    print_status(&snapshot);
    Ok(())
}

fn print_status(snapshot: &Snapshot) {
    println!("{}", "Knowledge Base Status".bold());
    println!();
    println!("{}:   {}", "Root".dimmed(), snapshot.repo_root);
    println!("{}:     {}", "KB".dimmed(), snapshot.kb_path);

    if !snapshot.is_loaded() {
        println!("{}: {}", "Status".dimmed(), "not loaded".yellow());
        println!();
        println!("Run {} to load.", "kb load".cyan());
        return;
    }

    println!("{}: {}", "Status".dimmed(), "loaded".green());
    if let Some(loaded_at) = snapshot.loaded_at {
        println!(
            "{}: {}",
            "Loaded".dimmed(),
            loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    let tracked = snapshot.fingerprints().map_or(0, |f| f.len());
    println!("{}: {} files", "Tracked".dimmed(), tracked);
    println!();

    let counts = &snapshot.counts;
    println!("{}: {}", "Core Documents".bold(), counts.core_docs_count);
    println!(
        "{}: {} in {} categories",
        "Knowledge Cards".bold(),
        counts.knowledge_cards_count,
        counts.categories_count
    );
    for (category, count) in &snapshot.categories {
        println!("  {} {} ({})", "+".green(), category.cyan(), count);
    }
    println!("{}:", "Schemas".bold());
    for (kind, count) in &counts.schema_counts {
        println!("  {} {}: {}", "+".green(), kind.cyan(), count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_test_utils::TestKnowledgeBase;

    #[test]
    fn test_status_not_loaded() {
        let kb = TestKnowledgeBase::new();
        assert!(run_status(kb.root(), false).is_ok());
    }

    #[test]
    fn test_status_loaded() {
        let kb = TestKnowledgeBase::populated();
        crate::commands::run_load(kb.root(), true).unwrap();
        assert!(run_status(kb.root(), false).is_ok());
        assert!(run_status(kb.root(), true).is_ok());
    }

    #[test]
    fn test_status_does_not_write() {
        let kb = TestKnowledgeBase::populated();
        run_status(kb.root(), false).unwrap();
        kb.assert_file_not_exists(".knowledge_cache/loader_status.json");
    }
}
