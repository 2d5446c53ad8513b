//! Filesystem-based persistent memory for AI coding assistants.
//!
//! Mnemonic stores memory "facts" as Markdown files with YAML frontmatter,
//! organized by namespace and scope, and maintains them with validation,
//! decay, link-checking, and relocation passes. Search is delegated to
//! plain text tools — the layout exists to make `grep` over
//! `*.memory.md` files meaningful; nothing here assumes an index beyond
//! the filesystem.
//!
//! Memories live in three cognitive types:
//!
//! | Type | Purpose | Decay |
//! |------|---------|-------|
//! | **Semantic** | Facts, knowledge, preferences | Slow |
//! | **Episodic** | Events, decisions, session logs | Fast |
//! | **Procedural** | Workflows, patterns, how-to | Slow |
//!
//! # Architecture
//!
//! Everything is a synchronous, single-process batch pass over local files.
//! A [`context::PathContext`] is built once per operation; the
//! [`paths::PathResolver`] computes locations from it with no I/O; the
//! maintenance passes walk the resolved roots and always run to
//! completion, reporting per-file findings instead of aborting on the
//! first bad file.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`context`] — Org/project/scheme detection, done once per operation
//! - [`paths`] — Pure path resolution for memories, blackboards, ontologies
//! - [`memory`] — The memory record model: frontmatter parsing and file naming
//! - [`validate`] — MIF Level 3 schema validation with structured findings
//! - [`links`] — Wiki-link index, broken-link and orphan detection
//! - [`decay`] — Time-based relevance strength recomputation
//! - [`relocate`] — Moves with corpus-wide reference repair

pub mod config;
pub mod context;
pub mod decay;
pub mod error;
pub mod links;
pub mod memory;
pub mod paths;
pub mod relocate;
pub mod validate;
