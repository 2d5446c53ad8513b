#![allow(dead_code)]

use std::path::{Path, PathBuf};

use mnemonic::context::PathContext;
use mnemonic::memory::{slugify, PathScheme};
use tempfile::TempDir;

/// Create an isolated corpus root with separate home and project dirs, and
/// a context pointing at them.
pub fn test_corpus(scheme: PathScheme) -> (TempDir, PathContext) {
    let tmp = TempDir::new().unwrap();
    let home = tmp.path().join("home");
    let project = tmp.path().join("project");
    std::fs::create_dir_all(&home).unwrap();
    std::fs::create_dir_all(&project).unwrap();
    let ctx = PathContext::new("acme", "widgets", home, project, scheme);
    (tmp, ctx)
}

/// Full text of a minimal valid memory file.
pub fn memory_text(id: &str, title: &str, memory_type: &str, namespace: &str, body: &str) -> String {
    format!(
        "---\n\
id: {id}\n\
type: {memory_type}\n\
namespace: {namespace}\n\
created: 2026-01-01T00:00:00Z\n\
title: \"{title}\"\n\
---\n\n\
{body}"
    )
}

/// Memory file text with an exponential decay block.
pub fn decaying_memory_text(
    id: &str,
    title: &str,
    half_life: &str,
    strength: f64,
    last_accessed: &str,
) -> String {
    format!(
        "---
id: {id}
type: semantic
namespace: facts/user
created: 2026-01-01T00:00:00Z
title: \"{title}\"
temporal:
  last_accessed: {last_accessed}
  decay:
    model: exponential
    half_life: {half_life}
    strength: {strength}
---

A decaying fact.
"
    )
}

/// Write `text` under `dir` with the canonical `{id}-{slug}.memory.md` name.
pub fn write_memory(dir: &Path, id: &str, title: &str, text: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(format!("{id}-{}.memory.md", slugify(title)));
    std::fs::write(&path, text).unwrap();
    path
}

/// Deterministic test UUIDs (valid v4 shape, distinct).
pub fn test_id(n: u8) -> String {
    format!("{n:08x}-0000-4000-8000-00000000000{}", n % 10)
}
