//! On-disk memory record: YAML frontmatter + Markdown body.
//!
//! Parsing is deliberately lenient — every frontmatter field is optional at
//! the type level so a structurally sound file always loads, and the schema
//! validator reports what is missing or malformed as findings instead of the
//! parser rejecting the file outright. Only missing `---` delimiters or
//! invalid YAML count as a [`MnemonicError::Parse`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MnemonicError, Result};

/// Frontmatter of a `.memory.md` file (MIF schema).
///
/// Unknown keys are captured in `extra` and survive rewrites, so a decay or
/// relocation pass never drops fields it does not understand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub memory_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal: Option<Temporal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_refs: Option<Vec<CodeRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<Citation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<ConflictEntry>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Temporal validity and decay metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Temporal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<String>,
    /// ISO-8601 duration after which the fact should be re-verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decay: Option<Decay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<String>,
}

/// Relevance decay parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Decay {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// ISO-8601 duration, e.g. `P7D`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_life: Option<String>,
    /// Relevance score in `[0.0, 1.0]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
}

/// Where a memory came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Pointer into a source tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ref_type: Option<String>,
}

/// External source citation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub citation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A recorded conflict with another memory and how it was resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflictEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

/// One memory file: frontmatter plus Markdown body.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecord {
    pub front: Frontmatter,
    /// Everything after the closing `---`, verbatim. May contain
    /// `[[id-or-slug]]` relationship links and `@[[Entity]]` references.
    pub body: String,
}

impl MemoryRecord {
    /// Create a fresh record with a generated id and creation timestamp.
    ///
    /// Capture tooling builds the record object and serializes it once;
    /// YAML is never assembled by string templating.
    pub fn new(title: &str, memory_type: crate::memory::MemoryType, namespace: &str) -> Self {
        Self {
            front: Frontmatter {
                id: Some(uuid::Uuid::new_v4().to_string()),
                memory_type: Some(memory_type.as_str().to_string()),
                namespace: Some(namespace.to_string()),
                created: Some(chrono::Utc::now().to_rfc3339()),
                title: Some(title.to_string()),
                ..Default::default()
            },
            body: String::new(),
        }
    }

    /// Parse the full text of a `.memory.md` file.
    ///
    /// `path` is only used for error reporting.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let rest = text.strip_prefix("---\n").or_else(|| {
            // Tolerate CRLF on the opening delimiter line.
            text.strip_prefix("---\r\n")
        });
        let Some(rest) = rest else {
            return Err(MnemonicError::Parse {
                path: path.to_path_buf(),
                reason: "missing opening --- delimiter".into(),
            });
        };

        let Some(idx) = find_closing_delimiter(rest) else {
            return Err(MnemonicError::Parse {
                path: path.to_path_buf(),
                reason: "missing closing --- delimiter".into(),
            });
        };
        let yaml = &rest[..idx + 1];
        let after = &rest[idx + 4..];
        // Drop the delimiter's own line ending, keep the body verbatim.
        let body = after
            .strip_prefix("\r\n")
            .or_else(|| after.strip_prefix('\n'))
            .unwrap_or(after);

        let front: Frontmatter =
            serde_yaml::from_str(yaml).map_err(|e| MnemonicError::Parse {
                path: path.to_path_buf(),
                reason: format!("invalid YAML frontmatter: {e}"),
            })?;

        Ok(Self {
            front,
            body: body.to_string(),
        })
    }

    /// Read and parse a record from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, path)
    }

    /// Serialize back to file text.
    ///
    /// The frontmatter is built from the record struct and serialized once —
    /// never assembled by string templating.
    pub fn to_file_string(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(&self.front).map_err(|e| MnemonicError::Parse {
            path: std::path::PathBuf::new(),
            reason: format!("cannot serialize frontmatter: {e}"),
        })?;
        Ok(format!("---\n{yaml}---\n\n{}", self.body))
    }

    /// Write the record to `path` atomically (temp file + rename), creating
    /// parent directories as needed. A crash mid-write never leaves a
    /// half-written memory file behind.
    pub fn store(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, self.to_file_string()?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Canonical filename for this record: `{id}-{slug}.memory.md`.
    ///
    /// Returns `None` when the record has no `id` or `title`.
    pub fn filename(&self) -> Option<String> {
        let id = self.front.id.as_deref()?;
        let title = self.front.title.as_deref()?;
        Some(format!("{id}-{}.memory.md", slugify(title)))
    }
}

/// Byte offset of the first `\n---` that actually closes the frontmatter:
/// the delimiter must be followed by end-of-input or a line break, which
/// guards against `---`-bearing strings inside the YAML itself.
fn find_closing_delimiter(rest: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(found) = rest[search_from..].find("\n---") {
        let idx = search_from + found;
        let after = &rest[idx + 4..];
        if after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n") {
            return Some(idx);
        }
        search_from = idx + 1;
    }
    None
}

/// Derive a filename slug from a title: lowercased, non-alphanumerics
/// collapsed to single hyphens, trimmed, truncated to 50 characters.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_hyphen = true; // suppress a leading hyphen
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(50);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Extract the slug portion of a `{uuid}-{slug}.memory.md` filename.
///
/// Returns `None` when the name does not follow the convention.
pub fn slug_from_filename(name: &str) -> Option<&str> {
    let stem = name.strip_suffix(".memory.md")?;
    // UUID v4 is 36 chars; the slug follows the joining hyphen.
    stem.get(37..).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const MINIMAL: &str = "---\n\
id: 6f1b24a0-8c3d-4e5f-9a7b-1c2d3e4f5a6b\n\
type: semantic\n\
namespace: decisions/project\n\
created: 2026-01-15T10:30:00Z\n\
title: \"Use SQLite for local cache\"\n\
---\n\n\
We decided to use SQLite. See [[other-memory]].\n";

    fn p() -> PathBuf {
        PathBuf::from("test.memory.md")
    }

    #[test]
    fn parse_minimal_record() {
        let rec = MemoryRecord::parse(MINIMAL, &p()).unwrap();
        assert_eq!(
            rec.front.id.as_deref(),
            Some("6f1b24a0-8c3d-4e5f-9a7b-1c2d3e4f5a6b")
        );
        assert_eq!(rec.front.memory_type.as_deref(), Some("semantic"));
        assert_eq!(rec.front.title.as_deref(), Some("Use SQLite for local cache"));
        assert!(rec.body.contains("[[other-memory]]"));
    }

    #[test]
    fn parse_rejects_missing_delimiters() {
        assert!(MemoryRecord::parse("id: abc\n", &p()).is_err());
        assert!(MemoryRecord::parse("---\nid: abc\n", &p()).is_err());
    }

    #[test]
    fn parse_rejects_invalid_yaml() {
        let text = "---\nid: [unclosed\n---\n\nbody\n";
        assert!(MemoryRecord::parse(text, &p()).is_err());
    }

    #[test]
    fn round_trip_preserves_body_and_unknown_keys() {
        let text = "---\n\
id: 6f1b24a0-8c3d-4e5f-9a7b-1c2d3e4f5a6b\n\
type: semantic\n\
namespace: decisions/project\n\
created: 2026-01-15T10:30:00Z\n\
title: Custom\n\
x_custom_field: kept\n\
---\n\n\
Body with [[link]] intact.\n";
        let rec = MemoryRecord::parse(text, &p()).unwrap();
        assert_eq!(rec.body, "Body with [[link]] intact.\n");

        let out = rec.to_file_string().unwrap();
        assert!(out.contains("x_custom_field: kept"));
        let rec2 = MemoryRecord::parse(&out, &p()).unwrap();
        assert_eq!(rec2.body, rec.body);
        assert_eq!(rec2.front.id, rec.front.id);
    }

    #[test]
    fn new_records_validate_cleanly() {
        let rec = MemoryRecord::new("Fresh fact", crate::memory::MemoryType::Semantic, "facts/user");
        let name = rec.filename().unwrap();
        let result = crate::validate::validate(&rec, Some(&name));
        assert!(result.valid, "{:?}", result.errors);
    }

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Use SQLite for local cache"), "use-sqlite-for-local-cache");
        assert_eq!(slugify("  Weird -- punctuation!! "), "weird-punctuation");
    }

    #[test]
    fn slugify_truncates_to_50() {
        let long = "a".repeat(80);
        assert_eq!(slugify(&long).len(), 50);
    }

    #[test]
    fn filename_embeds_id_and_slug() {
        let rec = MemoryRecord::parse(MINIMAL, &p()).unwrap();
        assert_eq!(
            rec.filename().unwrap(),
            "6f1b24a0-8c3d-4e5f-9a7b-1c2d3e4f5a6b-use-sqlite-for-local-cache.memory.md"
        );
    }

    #[test]
    fn slug_from_filename_splits_uuid() {
        let name = "6f1b24a0-8c3d-4e5f-9a7b-1c2d3e4f5a6b-use-sqlite.memory.md";
        assert_eq!(slug_from_filename(name), Some("use-sqlite"));
        assert_eq!(slug_from_filename("notes.md"), None);
    }
}
