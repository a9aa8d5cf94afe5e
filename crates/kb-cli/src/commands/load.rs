//! Load command implementation

use std::path::Path;

use colored::Colorize;
use kb_core::{KnowledgeBase, Reconciler, Reloaded};

use crate::error::Result;

/// Run the load command
///
/// Reloads everything and persists a new snapshot regardless of freshness.
pub fn run_load(root: &Path, quiet: bool) -> Result<()> {
    if !quiet {
        println!("{} Loading knowledge base...", "=>".blue().bold());
    }

    let reloaded = Reconciler::open(root)?.load()?;

    if !quiet {
        print_summary(&reloaded);
    }
    Ok(())
}

/// Print what a reload ingested.
pub(crate) fn print_summary(reloaded: &Reloaded) {
    let knowledge = &reloaded.knowledge;
    let counts = &reloaded.snapshot.counts;

    println!();
    println!("{}:", "Core Documents".bold());
    if knowledge.core_docs.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for (name, doc) in &knowledge.core_docs {
        println!("  {} {} ({} chars)", "+".green(), name.cyan(), doc.size);
    }

    println!();
    println!("{}:", "Knowledge Cards".bold());
    if knowledge.cards.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for (category, cards) in &knowledge.cards {
        let names: Vec<&str> = cards.keys().map(String::as_str).collect();
        println!(
            "  {} {} ({}): {}",
            "+".green(),
            category.cyan(),
            cards.len(),
            names.join(", ")
        );
    }

    println!();
    println!("{}:", "Schemas".bold());
    for (kind, count) in &counts.schema_counts {
        println!("  {} {}: {}", "+".green(), kind.cyan(), count);
    }

    print_auxiliary(knowledge);

    println!();
    println!("{}: {}", "Total Knowledge Items".bold(), knowledge.total_items());
    println!(
        "{} Loaded {} documents and {} cards in {} categories.",
        "OK".green().bold(),
        counts.core_docs_count,
        counts.knowledge_cards_count,
        counts.categories_count
    );
}

fn print_auxiliary(knowledge: &KnowledgeBase) {
    let mut loaded = Vec::new();
    if knowledge.manifest.is_some() {
        loaded.push("manifest".to_string());
    }
    if let Some(signatures) = &knowledge.api_signatures {
        loaded.push(format!("API signatures ({} chars)", signatures.chars().count()));
    }
    loaded.extend(knowledge.documentation.keys().cloned());

    if loaded.is_empty() {
        return;
    }
    println!();
    println!("{}:", "Also Loaded".bold());
    for item in loaded {
        println!("  {} {}", "+".green(), item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_test_utils::TestKnowledgeBase;

    #[test]
    fn test_load_writes_snapshot() {
        let kb = TestKnowledgeBase::populated();
        run_load(kb.root(), true).unwrap();
        kb.assert_file_exists(".knowledge_cache/loader_status.json");
    }

    #[test]
    fn test_load_empty_repository() {
        let kb = TestKnowledgeBase::new();
        assert!(run_load(kb.root(), false).is_ok());
    }

    #[test]
    fn test_load_fails_on_invalid_card() {
        let kb = TestKnowledgeBase::populated();
        kb.write_card("patterns", "broken", "title: [unclosed\n");
        assert!(run_load(kb.root(), true).is_err());
        kb.assert_file_not_exists(".knowledge_cache/loader_status.json");
    }
}
