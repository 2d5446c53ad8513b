pub mod record;
pub mod types;

pub use record::{slug_from_filename, slugify, MemoryRecord};
pub use types::{MemoryType, PathScheme, Scope};

/// Filename suffix shared by every memory file in the corpus.
pub const MEMORY_SUFFIX: &str = ".memory.md";
