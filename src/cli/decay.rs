//! CLI `decay` command — recompute relevance strength across the corpus.

use anyhow::Result;
use chrono::Utc;

use crate::context::PathContext;
use crate::decay::{current_strength, recompute, set_strength};
use crate::memory::MemoryRecord;
use crate::paths::PathResolver;

/// Recompute decay strength for every memory, persisting only records whose
/// strength moved past the change threshold. Each write is atomic, so an
/// interrupt mid-pass can only leave the pass incomplete, never a file
/// corrupt.
pub fn run(ctx: &PathContext, dry_run: bool) -> Result<()> {
    let resolver = PathResolver::new(ctx);
    let files = super::memory_files(&resolver.all_memory_roots());
    let now = Utc::now();

    let mut updated = 0usize;
    let mut unchanged = 0usize;
    let mut skipped = 0usize;
    let pb = super::batch_progress(files.len());

    for path in &files {
        pb.inc(1);
        let mut record = match MemoryRecord::load(path) {
            Ok(r) => r,
            Err(e) => {
                skipped += 1;
                println!("SKIP  {} ({e})", path.display());
                continue;
            }
        };

        let result = match recompute(&record, now) {
            Ok(r) => r,
            Err(e) => {
                skipped += 1;
                println!("SKIP  {} ({e})", path.display());
                continue;
            }
        };

        if !result.changed {
            unchanged += 1;
            continue;
        }

        if dry_run {
            println!(
                "WOULD UPDATE  {}  {:.3} -> {:.3}",
                path.display(),
                current_strength(&record),
                result.new_strength
            );
            updated += 1;
        } else {
            set_strength(&mut record, result.new_strength);
            // A failed write skips the file; the pass runs to completion.
            match record.store(path) {
                Ok(()) => updated += 1,
                Err(e) => {
                    skipped += 1;
                    println!("SKIP  {} ({e})", path.display());
                }
            }
        }
    }
    pb.finish_and_clear();

    println!();
    println!("Decay Summary{}", if dry_run { " (dry run)" } else { "" });
    println!("{}", "=".repeat(40));
    println!("  Checked:    {}", files.len());
    println!("  Updated:    {updated}");
    println!("  Unchanged:  {unchanged}");
    println!("  Skipped:    {skipped}");

    Ok(())
}
