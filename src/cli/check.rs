//! CLI `check` command — link index, broken links, and orphan detection.

use std::collections::HashSet;

use anyhow::Result;

use crate::config::MnemonicConfig;
use crate::context::PathContext;
use crate::links::{find_links, find_orphans, fix_broken, LinkIndex};
use crate::memory::MemoryRecord;
use crate::paths::PathResolver;

/// Check cross-reference integrity across the corpus. With `fix`, broken
/// `[[links]]` are replaced by their plain-text labels — an explicit,
/// opt-in mutation.
pub fn run(ctx: &PathContext, config: &MnemonicConfig, fix: bool) -> Result<usize> {
    let resolver = PathResolver::new(ctx);
    let index = LinkIndex::build(&resolver.all_memory_roots());

    println!("Indexed {} memories.", index.len());
    for skipped in &index.skipped {
        println!("SKIP  {} ({})", skipped.path.display(), skipped.reason);
    }

    let mut all_links: HashSet<String> = HashSet::new();
    let mut broken_total = 0;
    let mut fixed_files = 0;
    let mut write_errors = 0;

    for entry in index.entries() {
        let mut record = match MemoryRecord::load(&entry.path) {
            Ok(r) => r,
            Err(_) => continue, // already reported during indexing
        };

        let links = find_links(&record.body);
        all_links.extend(links.iter().cloned());

        let broken: Vec<String> = links
            .into_iter()
            .filter(|l| index.resolve(l).is_none())
            .collect();
        if broken.is_empty() {
            continue;
        }
        broken_total += broken.len();

        for link in &broken {
            println!("BROKEN  {}  [[{}]]", entry.path.display(), link);
        }

        if fix {
            record.body = fix_broken(&record.body, &broken);
            // A failed write skips the file; the pass runs to completion.
            match record.store(&entry.path) {
                Ok(()) => fixed_files += 1,
                Err(e) => {
                    write_errors += 1;
                    println!("ERROR  {} ({e})", entry.path.display());
                }
            }
        }
    }

    let orphans = if config.maintenance.report_orphans {
        find_orphans(&index, &all_links)
    } else {
        Vec::new()
    };
    for id in &orphans {
        println!("ORPHAN  {id}");
    }

    println!();
    println!("Link Check Summary");
    println!("{}", "=".repeat(40));
    println!("  Memories:      {}", index.len());
    println!("  Broken links:  {broken_total}");
    println!("  Orphans:       {}", orphans.len());
    println!("  Unparseable:   {}", index.skipped.len());
    if fix {
        println!("  Fixed files:   {fixed_files}");
        if write_errors > 0 {
            println!("  Write errors:  {write_errors}");
        }
    } else if broken_total > 0 {
        println!();
        println!("Run `mnemonic check --fix` to unlink broken references.");
    }

    Ok(broken_total)
}
