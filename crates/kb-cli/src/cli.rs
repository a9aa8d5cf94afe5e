//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Knowledge base loader - keep an agent knowledge snapshot in step with its sources
#[derive(Parser, Debug)]
#[command(name = "kb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Repository root (defaults to the nearest directory holding
    /// `.knowledge.toml` or `knowledge_base/`)
    #[arg(long, global = true, env = "KB_REPO_ROOT", value_name = "PATH")]
    pub repo_root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Load the knowledge base and persist a fresh snapshot
    Load {
        /// Print nothing on success
        #[arg(short, long)]
        quiet: bool,
    },

    /// Reload only if sources changed since the last snapshot
    ///
    /// Examples:
    ///   kb update            # Report what changed, if anything
    ///   kb update --quiet    # For shell startup hooks
    Update {
        /// Print nothing on success
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show the persisted snapshot
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Install the activation script and shell hook, then load
    ///
    /// Writes `.activate_knowledge.sh` into the repository root and adds an
    /// auto-update hook to `~/.bashrc` unless `--no-profile` is given.
    Setup {
        /// Do not touch the shell profile
        #[arg(long)]
        no_profile: bool,
    },
}
