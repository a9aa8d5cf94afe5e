//! Setup command implementation

use std::path::Path;

use colored::Colorize;
use kb_core::ProfileHook;
use kb_core::activation::{self, Activation};

use crate::commands::run_load;
use crate::error::Result;

/// Run the setup command
///
/// Installs the activation script, hooks `~/.bashrc` unless `no_profile`,
/// then performs a full load.
pub fn run_setup(root: &Path, no_profile: bool) -> Result<()> {
    let profile = if no_profile {
        None
    } else {
        activation::default_profile()
    };
    run_setup_with_profile(root, profile.as_deref())
}

pub(crate) fn run_setup_with_profile(root: &Path, profile: Option<&Path>) -> Result<()> {
    println!("{} Setting up knowledge base activation...", "=>".blue().bold());

    let program = current_program();
    let activation = activation::install(root, &program, profile)?;
    report(&activation);

    println!();
    run_load(root, false)
}

/// Absolute path of the running binary, or its bare name.
fn current_program() -> String {
    std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "kb".to_string())
}

fn report(activation: &Activation) {
    println!(
        "   {} {}",
        "+".green(),
        activation.script.display().to_string().cyan()
    );

    match &activation.profile {
        None => println!("   {} shell profile skipped", "-".dimmed()),
        Some((path, ProfileHook::Installed)) => {
            println!("   {} auto-update hook added to {}", "+".green(), path.display());
        }
        Some((path, ProfileHook::AlreadyPresent)) => {
            println!("   {} hook already present in {}", "=".dimmed(), path.display());
        }
        Some((path, ProfileHook::ProfileMissing)) => {
            println!(
                "   {} {} not found, hook not installed",
                "!".yellow(),
                path.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_test_utils::TestKnowledgeBase;

    #[test]
    fn test_setup_installs_and_loads() {
        let kb = TestKnowledgeBase::populated();
        let profile = kb.write_file("home/.bashrc", "");

        run_setup_with_profile(kb.root(), Some(&profile)).unwrap();

        kb.assert_file_exists(".activate_knowledge.sh");
        kb.assert_file_exists(".knowledge_cache/loader_status.json");
        let content = std::fs::read_to_string(&profile).unwrap();
        assert!(content.contains(activation::PROFILE_MARKER));
    }

    #[test]
    fn test_setup_without_profile() {
        let kb = TestKnowledgeBase::populated();
        run_setup(kb.root(), true).unwrap();
        kb.assert_file_exists(".activate_knowledge.sh");
    }
}
