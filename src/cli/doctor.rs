//! CLI `doctor` command — environment and corpus diagnostics.

use anyhow::Result;

use crate::config::MnemonicConfig;
use crate::context::{PathContext, DEFAULT_PARTITION};
use crate::links::LinkIndex;
use crate::paths::PathResolver;

/// Inspect the detected environment and corpus health, and print a report.
pub fn run(ctx: &PathContext, config: &MnemonicConfig) -> Result<()> {
    let resolver = PathResolver::new(ctx);

    println!("Mnemonic Health Report");
    println!("======================");
    println!();
    println!("Org:               {}", ctx.org);
    println!("Project:           {}", ctx.project);
    if ctx.org == DEFAULT_PARTITION || ctx.project == DEFAULT_PARTITION {
        println!("  Note: no git remote detected; using the \"default\" partition.");
    }
    println!("Scheme:            {}", ctx.scheme);
    println!("Home dir:          {}", ctx.home_dir.display());
    println!("Store root:        {}", ctx.store_root.display());
    println!("Project dir:       {}", ctx.project_dir.display());
    println!("Default half-life: {}", config.maintenance.default_half_life);
    println!();

    println!("Memory roots:");
    let roots = resolver.all_memory_roots();
    for root in &roots {
        let status = if root.is_dir() { "present" } else { "absent" };
        println!("  {:<10} {}", status, root.display());
    }
    println!();

    let index = LinkIndex::build(&roots);
    println!("Corpus:");
    println!("  Memories:        {}", index.len());
    println!("  Unparseable:     {}", index.skipped.len());
    for skipped in &index.skipped {
        println!("    {} ({})", skipped.path.display(), skipped.reason);
    }
    println!();

    println!("Ontology candidates (first existing wins):");
    for path in resolver.ontology_paths() {
        let status = if path.is_file() { "present" } else { "absent" };
        println!("  {:<10} {}", status, path.display());
    }

    if !index.skipped.is_empty() {
        println!();
        println!("Recovery steps:");
        println!("  1. Open each unparseable file and repair its --- frontmatter.");
        println!("  2. Re-run `mnemonic validate` to confirm.");
    }

    Ok(())
}
