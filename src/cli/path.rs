//! CLI `path` command — print resolved locations for a namespace.
//!
//! A thin front over the resolver, for callers (scripts, LLM-driven skills)
//! that need the canonical location without linking against the library.

use anyhow::Result;

use crate::context::PathContext;
use crate::memory::Scope;
use crate::paths::PathResolver;

/// Print the memory directory for `namespace` at `scope`, or all search
/// paths in priority order when no scope is given.
pub fn run(ctx: &PathContext, namespace: &str, scope: Option<Scope>) -> Result<()> {
    let resolver = PathResolver::new(ctx);
    match scope {
        Some(scope) => println!("{}", resolver.memory_dir(namespace, scope).display()),
        None => {
            for path in resolver.search_paths(namespace, true, true, true) {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}
