//! Knowledge base loader CLI
//!
//! Loads an agent knowledge base and keeps its persisted snapshot current.

mod cli;
mod commands;
mod context;
mod error;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {e}")))?;
        tracing::debug!("Verbose mode enabled");
    }

    let cwd = std::env::current_dir()?;
    let root = context::resolve_root(cli.repo_root, &cwd);

    match cli.command {
        Some(cmd) => execute_command(cmd, &root),
        None => {
            commands::run_status(&root, false)?;
            println!();
            println!("Run {} for available commands.", "kb --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands, root: &Path) -> Result<()> {
    match cmd {
        Commands::Load { quiet } => commands::run_load(root, quiet),
        Commands::Update { quiet } => commands::run_update(root, quiet),
        Commands::Status { json } => commands::run_status(root, json),
        Commands::Setup { no_profile } => commands::run_setup(root, no_profile),
    }
}
