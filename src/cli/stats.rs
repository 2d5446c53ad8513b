use std::collections::BTreeMap;

use anyhow::Result;

use crate::context::PathContext;
use crate::memory::{MemoryRecord, MemoryType};
use crate::paths::PathResolver;

/// Display corpus statistics in the terminal.
pub fn run(ctx: &PathContext) -> Result<()> {
    let resolver = PathResolver::new(ctx);
    let files = super::memory_files(&resolver.all_memory_roots());

    let mut total = 0usize;
    let mut unparseable = 0usize;
    let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_namespace: BTreeMap<String, usize> = BTreeMap::new();

    for path in &files {
        let record = match MemoryRecord::load(path) {
            Ok(r) => r,
            Err(_) => {
                unparseable += 1;
                continue;
            }
        };
        total += 1;
        let t = record
            .front
            .memory_type
            .unwrap_or_else(|| "(unset)".to_string());
        *by_type.entry(t).or_default() += 1;
        let ns = record
            .front
            .namespace
            .unwrap_or_else(|| "(unset)".to_string());
        *by_namespace.entry(ns).or_default() += 1;
    }

    println!("Memory Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total memories:      {total}");
    println!("  Unparseable:         {unparseable}");
    println!();

    println!("By Type:");
    for t in MemoryType::ALL {
        let count = by_type.get(t.as_str()).copied().unwrap_or(0);
        println!("  {:<12} {}", t.as_str(), count);
    }
    for (t, count) in &by_type {
        if t.parse::<MemoryType>().is_err() {
            println!("  {t:<12} {count}");
        }
    }
    println!();

    println!("By Namespace:");
    for (ns, count) in &by_namespace {
        println!("  {ns:<32} {count}");
    }

    Ok(())
}
