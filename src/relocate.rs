//! Memory relocation with corpus-wide link repair.
//!
//! A move is not local: every other memory's `[[slug]]` link and any literal
//! path reference must be updated together with the file move. The pass runs
//! in a fixed order — build index, plan, conflict-check, move, rewrite —
//! and fails before touching disk when the target is already occupied.
//! Rewrites after a completed move are the one place partial failure is
//! possible; the report flags exactly which files were rewritten and which
//! were not.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{MnemonicError, Result};
use crate::links::{find_links, is_memory_file, LinkIndex};
use crate::memory::{slug_from_filename, MemoryRecord};

/// One planned file move, with the identifiers whose references it affects.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedMove {
    pub from: PathBuf,
    pub to: PathBuf,
    /// Record id — stable across the move, so id-links never need rewriting.
    pub id: String,
    pub old_slug: Option<String>,
    pub new_slug: Option<String>,
}

/// A per-file problem encountered during the rewrite phase.
#[derive(Debug, Clone, Serialize)]
pub struct RelocationIssue {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one relocate call.
#[derive(Debug, Serialize)]
pub struct RelocationReport {
    pub dry_run: bool,
    pub moves: Vec<PlannedMove>,
    /// Files whose bodies were (or, in a dry run, would be) rewritten.
    pub rewritten_files: Vec<PathBuf>,
    pub errors: Vec<RelocationIssue>,
}

/// Move the memory file (or whole subtree) at `old_path` to `new_path`,
/// rewriting every reference in the corpus so no new broken links result.
///
/// `roots` are the memory roots to scan for referencing files, normally
/// `PathResolver::all_memory_roots()`. With `dry_run` the full plan is
/// computed and returned without touching disk; the plan exactly predicts
/// what a subsequent real call would do, assuming no external change to
/// the corpus in between.
///
/// Pre-existing broken links are out of scope: the pass only guarantees it
/// introduces no new breakage.
pub fn relocate(
    roots: &[PathBuf],
    old_path: &Path,
    new_path: &Path,
    dry_run: bool,
) -> Result<RelocationReport> {
    // 1. Fresh index so post-move resolution is known-correct.
    let index = LinkIndex::build(roots);

    // 2. Plan the moves and conflict-check before any mutation.
    let moves = plan_moves(old_path, new_path)?;
    for mv in &moves {
        check_conflict(mv)?;
    }

    // 3. Which files reference the moving identifiers?
    let rewrites = plan_rewrites(&index, &moves);

    let mut report = RelocationReport {
        dry_run,
        moves: moves.clone(),
        // Report post-move locations, so a dry run names the same files a
        // real run would (referencing files can themselves be moving).
        rewritten_files: rewrites
            .iter()
            .map(|r| moved_location(&r.path, &moves))
            .collect(),
        errors: Vec::new(),
    };
    if dry_run {
        return Ok(report);
    }

    // 4. Filesystem move. rename() preserves git's ability to detect the
    // move as a rename; cross-device falls back to copy + remove.
    for mv in &moves {
        move_file(&mv.from, &mv.to)?;
        info!(from = %mv.from.display(), to = %mv.to.display(), "moved memory");
    }

    // 5. Rewrite referencing bodies, atomically per file. Failures here are
    // recorded and the pass continues — the report tells the operator which
    // files still hold stale references.
    report.rewritten_files.clear();
    for rewrite in &rewrites {
        // The referencing file may itself have just moved.
        let path = moved_location(&rewrite.path, &moves);
        match apply_rewrite(&path, &rewrite.replacements) {
            Ok(()) => report.rewritten_files.push(path),
            Err(e) => {
                warn!(path = %path.display(), "rewrite failed: {e}");
                report.errors.push(RelocationIssue {
                    path,
                    message: e.to_string(),
                });
            }
        }
    }

    // 6. Clean up directories the move emptied.
    for mv in &moves {
        if let Some(parent) = mv.from.parent() {
            remove_empty_dirs(parent);
        }
    }

    Ok(report)
}

/// A referencing file and the token replacements due in its body.
#[derive(Debug)]
struct PlannedRewrite {
    path: PathBuf,
    replacements: Vec<(String, String)>,
}

fn plan_moves(old_path: &Path, new_path: &Path) -> Result<Vec<PlannedMove>> {
    if old_path.is_dir() {
        let mut moves = Vec::new();
        for entry in walkdir::WalkDir::new(old_path)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !is_memory_file(entry.path()) {
                continue;
            }
            let rel = entry
                .path()
                .strip_prefix(old_path)
                .expect("walkdir yields children of its root");
            let to = new_path.join(rel);
            if entry.path() != to.as_path() {
                moves.push(planned_move(entry.path(), &to)?);
            }
        }
        Ok(moves)
    } else if old_path == new_path {
        // Relocating a file onto itself is a no-op, not a conflict.
        Ok(Vec::new())
    } else {
        Ok(vec![planned_move(old_path, new_path)?])
    }
}

fn planned_move(from: &Path, to: &Path) -> Result<PlannedMove> {
    let record = MemoryRecord::load(from)?;
    let id = record.front.id.clone().ok_or_else(|| MnemonicError::Parse {
        path: from.to_path_buf(),
        reason: "cannot relocate a memory with no id".into(),
    })?;
    Ok(PlannedMove {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        id,
        old_slug: file_slug(from),
        new_slug: file_slug(to),
    })
}

fn file_slug(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(slug_from_filename)
        .map(str::to_string)
}

/// Fail before touching disk when the target already holds a different
/// memory. A target carrying the same id is a stale duplicate and may be
/// overwritten.
fn check_conflict(mv: &PlannedMove) -> Result<()> {
    if !mv.to.exists() {
        return Ok(());
    }
    let existing_id = MemoryRecord::load(&mv.to)
        .ok()
        .and_then(|r| r.front.id)
        .unwrap_or_else(|| "<unparseable>".to_string());
    if existing_id == mv.id {
        return Ok(());
    }
    Err(MnemonicError::RelocationConflict {
        target: mv.to.clone(),
        existing_id,
    })
}

/// Scan every indexed file for references to the moving identifiers and
/// compute the per-file replacement list.
fn plan_rewrites(index: &LinkIndex, moves: &[PlannedMove]) -> Vec<PlannedRewrite> {
    let moving_paths: HashSet<&Path> = moves.iter().map(|m| m.from.as_path()).collect();
    let mut rewrites = Vec::new();

    for entry in index.entries() {
        let body = match MemoryRecord::load(&entry.path) {
            Ok(r) => r.body,
            Err(_) => continue, // already recorded as skipped by the index build
        };
        let links: HashSet<String> = find_links(&body).into_iter().collect();

        let mut replacements = Vec::new();
        for mv in moves {
            // Slug links break when the filename changes; id links survive.
            if let (Some(old_slug), Some(new_slug)) = (&mv.old_slug, &mv.new_slug) {
                if old_slug != new_slug && links.contains(old_slug) {
                    replacements
                        .push((format!("[[{old_slug}]]"), format!("[[{new_slug}]]")));
                }
            }
            // Literal path references (outside wiki-links) go stale either way.
            let old_str = mv.from.to_string_lossy();
            if body.contains(old_str.as_ref()) {
                replacements.push((
                    old_str.into_owned(),
                    mv.to.to_string_lossy().into_owned(),
                ));
            }
        }

        if !replacements.is_empty() && !moving_paths.contains(entry.path.as_path()) {
            rewrites.push(PlannedRewrite {
                path: entry.path.clone(),
                replacements,
            });
        }
    }

    // The moved files themselves may reference each other or their own path.
    for mv in moves {
        if let Ok(record) = MemoryRecord::load(&mv.from) {
            let old_str = mv.from.to_string_lossy();
            if record.body.contains(old_str.as_ref()) {
                rewrites.push(PlannedRewrite {
                    path: mv.from.clone(),
                    replacements: vec![(
                        old_str.into_owned(),
                        mv.to.to_string_lossy().into_owned(),
                    )],
                });
            }
        }
    }

    rewrites
}

/// Where a file ends up after the moves (identity for non-moving files).
fn moved_location(path: &Path, moves: &[PlannedMove]) -> PathBuf {
    moves
        .iter()
        .find(|m| m.from == path)
        .map(|m| m.to.clone())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Apply body replacements with an atomic write (temp + rename), so a crash
/// mid-pass leaves every individual file internally consistent.
fn apply_rewrite(path: &Path, replacements: &[(String, String)]) -> Result<()> {
    let mut record = MemoryRecord::load(path)?;
    for (old, new) in replacements {
        record.body = record.body.replace(old.as_str(), new.as_str());
    }
    record.store(path)?;
    debug!(path = %path.display(), count = replacements.len(), "rewrote references");
    Ok(())
}

fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(_) => {
            // Cross-device move: copy then remove.
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)?;
            Ok(())
        }
    }
}

/// Remove `dir` and its now-empty ancestors, stopping at the first
/// non-empty directory.
fn remove_empty_dirs(dir: &Path) {
    let mut current = Some(dir.to_path_buf());
    while let Some(d) = current {
        let empty = match std::fs::read_dir(&d) {
            Ok(mut entries) => entries.next().is_none(),
            Err(_) => false,
        };
        if !empty || std::fs::remove_dir(&d).is_err() {
            break;
        }
        current = d.parent().map(Path::to_path_buf);
    }
}
