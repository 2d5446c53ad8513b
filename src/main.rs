mod cli;
mod config;
mod context;
mod decay;
mod error;
mod links;
mod memory;
mod paths;
mod relocate;
mod validate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::PathContext;
use crate::memory::Scope;

#[derive(Parser)]
#[command(name = "mnemonic", version, about = "Filesystem memory layer for AI coding assistants")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate every memory file against the MIF schema
    Validate {
        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check wiki-link integrity and report orphans
    Check {
        /// Replace broken [[links]] with their plain-text labels
        #[arg(long)]
        fix: bool,
    },
    /// Recompute decay strength across the corpus
    Decay {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Move a memory file or namespace subtree, repairing references
    Relocate {
        old: PathBuf,
        new: PathBuf,
        /// Compute and print the plan without touching disk
        #[arg(long)]
        dry_run: bool,
    },
    /// Print an environment and corpus health report
    Doctor,
    /// Show corpus statistics by type and namespace
    Stats,
    /// Print the resolved directory for a namespace
    Path {
        namespace: String,
        /// Restrict to one scope (user, project, shared)
        #[arg(long)]
        scope: Option<Scope>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level and scheme)
    let config = config::MnemonicConfig::load()?;

    // Initialize tracing with the configured log level, to stderr so stdout
    // stays clean for report output.
    let filter = EnvFilter::try_new(&config.core.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // The context is built once here and threaded through every call; it is
    // never re-derived mid-pass.
    let cwd = std::env::current_dir()?;
    let ctx = PathContext::detect(&cwd, config.scheme(), config.core.root.clone())?;

    match cli.command {
        Command::Validate { json } => {
            let summary = cli::validate::run(&ctx, json)?;
            if summary.invalid > 0 {
                std::process::exit(1);
            }
        }
        Command::Check { fix } => {
            let broken = cli::check::run(&ctx, &config, fix)?;
            if broken > 0 && !fix {
                std::process::exit(1);
            }
        }
        Command::Decay { dry_run } => {
            cli::decay::run(&ctx, dry_run)?;
        }
        Command::Relocate { old, new, dry_run } => {
            cli::relocate::run(&ctx, &old, &new, dry_run)?;
        }
        Command::Doctor => {
            cli::doctor::run(&ctx, &config)?;
        }
        Command::Stats => {
            cli::stats::run(&ctx)?;
        }
        Command::Path { namespace, scope } => {
            cli::path::run(&ctx, &namespace, scope)?;
        }
    }

    Ok(())
}
