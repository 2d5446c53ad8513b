//! Library error taxonomy.
//!
//! Expected per-file conditions (bad frontmatter, broken links) are reported
//! as structured findings and never abort a batch pass; these error types
//! cover the cases that do stop an individual operation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MnemonicError {
    /// A `.memory.md` file is missing its `---` frontmatter delimiters or
    /// the frontmatter is not valid YAML. Batch passes skip the file with
    /// a finding; single-file operations surface this directly.
    #[error("cannot parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// The relocation target is already occupied by a different memory.
    /// Raised before any filesystem mutation — a conflicting relocate
    /// never partially applies.
    #[error("relocation target {} already holds memory {existing_id}", target.display())]
    RelocationConflict { target: PathBuf, existing_id: String },

    /// The resolution environment itself is unusable (e.g. no home
    /// directory). Fatal at process start, never a per-file error.
    #[error("cannot build path context: {0}")]
    Context(String),

    /// A duration string is not valid ISO-8601 (`P7D`, `PT12H`, ...).
    #[error("invalid ISO-8601 duration: {0:?}")]
    Duration(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MnemonicError>;
