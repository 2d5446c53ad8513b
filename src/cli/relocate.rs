//! CLI `relocate` command — move a memory or subtree, repairing references.

use std::path::Path;

use anyhow::Result;

use crate::context::PathContext;
use crate::paths::PathResolver;
use crate::relocate::relocate;

pub fn run(ctx: &PathContext, old: &Path, new: &Path, dry_run: bool) -> Result<()> {
    let resolver = PathResolver::new(ctx);
    let report = relocate(&resolver.all_memory_roots(), old, new, dry_run)?;

    let verb = if dry_run { "Would move" } else { "Moved" };
    for mv in &report.moves {
        println!("{verb}  {}  ->  {}", mv.from.display(), mv.to.display());
    }
    let verb = if dry_run { "Would rewrite" } else { "Rewrote" };
    for path in &report.rewritten_files {
        println!("{verb}  {}", path.display());
    }

    if !report.errors.is_empty() {
        println!();
        println!("Files left with stale references (repair manually):");
        for issue in &report.errors {
            println!("  {}  {}", issue.path.display(), issue.message);
        }
        anyhow::bail!("{} file(s) could not be rewritten", report.errors.len());
    }

    println!();
    println!(
        "Relocation {}: {} move(s), {} file(s) rewritten.",
        if dry_run { "plan" } else { "complete" },
        report.moves.len(),
        report.rewritten_files.len()
    );
    Ok(())
}
