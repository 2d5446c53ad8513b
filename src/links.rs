//! Cross-reference graph maintenance.
//!
//! Memories reference each other with `[[identifier]]` wiki-links, where the
//! identifier is a UUID or a filename slug. [`LinkIndex`] maps both forms to
//! absolute file paths. The index is a disposable cache: it is rebuilt from
//! scratch for every maintenance pass and never persisted, because the
//! corpus is a loosely-synchronized git-backed file tree that can change
//! between runs. Correctness over performance is the right tradeoff at
//! hundreds to low thousands of files.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::warn;
use walkdir::WalkDir;

use crate::memory::{slug_from_filename, MemoryRecord, MEMORY_SUFFIX};

/// `[[identifier]]`, optionally preceded by `@` (entity references, which
/// are not relationship links and are never indexed or rewritten).
static WIKI_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(@?)\[\[([^\[\]]+)\]\]").unwrap());

/// One indexed memory file.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: String,
    pub slug: Option<String>,
    pub path: PathBuf,
}

/// A file the scan could not parse; recorded, never fatal.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Identifier → path mapping over all discovered memory roots.
#[derive(Debug, Default)]
pub struct LinkIndex {
    entries: Vec<IndexEntry>,
    by_key: HashMap<String, PathBuf>,
    /// Unparseable files encountered during the scan.
    pub skipped: Vec<SkippedFile>,
}

impl LinkIndex {
    /// Scan every `*.memory.md` under `roots` and build the index.
    ///
    /// Roots that do not exist are silently skipped (path computation never
    /// guarantees existence). Unparseable files are recorded in `skipped`
    /// and the scan continues.
    pub fn build(roots: &[PathBuf]) -> Self {
        let mut index = Self::default();
        for root in roots {
            if !root.is_dir() {
                continue;
            }
            for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if !is_memory_file(path) {
                    continue;
                }
                index.add_file(path);
            }
        }
        index
    }

    fn add_file(&mut self, path: &Path) {
        let record = match MemoryRecord::load(path) {
            Ok(r) => r,
            Err(e) => {
                warn!(path = %path.display(), "skipping unparseable memory file: {e}");
                self.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                return;
            }
        };

        let Some(id) = record.front.id.clone() else {
            self.skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: "frontmatter has no id".into(),
            });
            return;
        };

        let slug = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(slug_from_filename)
            .map(str::to_string);

        self.by_key.insert(id.clone(), path.to_path_buf());
        if let Some(ref slug) = slug {
            self.by_key.insert(slug.clone(), path.to_path_buf());
        }
        self.entries.push(IndexEntry {
            id,
            slug,
            path: path.to_path_buf(),
        });
    }

    /// Resolve a link identifier (UUID or slug) to the file it names.
    pub fn resolve(&self, link: &str) -> Option<&Path> {
        self.by_key.get(link).map(PathBuf::as_path)
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Extract every relationship-link identifier from a body, in order of
/// appearance. `@[[Entity]]` tokens are excluded.
pub fn find_links(body: &str) -> Vec<String> {
    WIKI_LINK
        .captures_iter(body)
        .filter(|c| c[1].is_empty())
        .map(|c| c[2].to_string())
        .collect()
}

/// Memories referenced by nothing in `all_links` (neither by id nor slug).
///
/// An orphan is a maintenance signal, not an error — the memory is still
/// findable by search.
pub fn find_orphans(index: &LinkIndex, all_links: &HashSet<String>) -> Vec<String> {
    index
        .entries()
        .iter()
        .filter(|e| {
            !all_links.contains(&e.id)
                && !e.slug.as_ref().is_some_and(|s| all_links.contains(s))
        })
        .map(|e| e.id.clone())
        .collect()
}

/// Replace each broken `[[link]]` with its plain-text label, leaving all
/// other content byte-identical. Entity references are untouched. This is
/// an explicit, opt-in mutation — never applied automatically.
pub fn fix_broken(body: &str, broken: &[String]) -> String {
    if broken.is_empty() {
        return body.to_string();
    }
    WIKI_LINK
        .replace_all(body, |caps: &Captures| {
            let target = &caps[2];
            if caps[1].is_empty() && broken.iter().any(|b| b == target) {
                target.to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// True for paths ending in `.memory.md`.
pub fn is_memory_file(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(MEMORY_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_links_extracts_in_order() {
        let body = "See [[aaa]] and [[some-slug]] but not plain text.";
        assert_eq!(find_links(body), vec!["aaa", "some-slug"]);
    }

    #[test]
    fn entity_references_are_not_links() {
        let body = "Ask @[[Jane Doe]] about [[design-notes]].";
        assert_eq!(find_links(body), vec!["design-notes"]);
    }

    #[test]
    fn fix_broken_replaces_only_broken_targets() {
        let body = "Keep [[good-link]], drop [[gone]], keep @[[Entity]].";
        let fixed = fix_broken(body, &["gone".to_string()]);
        assert_eq!(fixed, "Keep [[good-link]], drop gone, keep @[[Entity]].");
    }

    #[test]
    fn fix_broken_with_empty_list_is_identity() {
        let body = "Nothing [[changes]] here.";
        assert_eq!(fix_broken(body, &[]), body);
    }

    #[test]
    fn orphans_are_unreferenced_entries() {
        let mut index = LinkIndex::default();
        index.entries.push(IndexEntry {
            id: "aaa".into(),
            slug: Some("first".into()),
            path: PathBuf::from("/m/aaa-first.memory.md"),
        });
        index.entries.push(IndexEntry {
            id: "bbb".into(),
            slug: Some("second".into()),
            path: PathBuf::from("/m/bbb-second.memory.md"),
        });

        let mut links = HashSet::new();
        links.insert("second".to_string()); // bbb referenced via slug
        let orphans = find_orphans(&index, &links);
        assert_eq!(orphans, vec!["aaa".to_string()]);
    }
}
