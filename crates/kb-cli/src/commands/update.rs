//! Update command implementation
//!
//! The cheap path: fingerprints are compared first and a reload happens only
//! when something under the configured roots changed.

use std::path::Path;

use colored::Colorize;
use kb_core::{FingerprintDiff, Reconciler};

use crate::commands::load::print_summary;
use crate::error::Result;

/// Run the update command
pub fn run_update(root: &Path, quiet: bool) -> Result<()> {
    let reconciler = Reconciler::open(root)?;
    let outcome = reconciler.check_and_reload_if_stale()?;

    if quiet {
        return Ok(());
    }

    let Some(knowledge) = outcome.knowledge else {
        println!(
            "{} Knowledge base is up to date.",
            "OK".green().bold()
        );
        return Ok(());
    };

    if let Some(reason) = outcome.staleness {
        println!("{} Reloading: {}", "=>".blue().bold(), reason);
    }
    print_changes(&outcome.changes, root);
    print_summary(&kb_core::Reloaded {
        snapshot: outcome.snapshot,
        knowledge,
    });
    Ok(())
}

fn print_changes(changes: &FingerprintDiff, root: &Path) {
    let groups = [
        ("+", "added", &changes.added),
        ("~", "modified", &changes.modified),
        ("-", "removed", &changes.removed),
    ];
    for (sign, label, keys) in groups {
        for key in keys {
            println!(
                "   {} {} ({})",
                sign.yellow(),
                display_key(key, root).cyan(),
                label.dimmed()
            );
        }
    }
}

/// Show keys relative to the repository root where possible.
fn display_key<'a>(key: &'a str, root: &Path) -> &'a str {
    let prefix = format!("{}/", kb_fs::identity_key(root).trim_end_matches('/'));
    key.strip_prefix(prefix.as_str()).unwrap_or(key)
}
