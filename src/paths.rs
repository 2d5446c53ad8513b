//! Deterministic path resolution for memories, blackboards, and ontologies.
//!
//! Every function here is a pure computation over a [`PathContext`] — no
//! filesystem access, no side effects. Computed directories may not exist
//! on disk; existence checks and `mkdir -p` are the caller's job. For a
//! fixed context, namespace, and scope the same path comes back on every
//! call.

use std::path::PathBuf;

use crate::context::PathContext;
use crate::memory::{PathScheme, Scope};

/// Directory name of the memory root under the home directory.
pub const HOME_ROOT: &str = "mnemonic";

/// Directory name of the project-local memory root (legacy scheme).
pub const PROJECT_ROOT: &str = ".mnemonic";

/// Reserved namespace for blackboard scratch files.
pub const BLACKBOARD_NS: &str = ".blackboard";

/// Ontology configuration filename.
pub const ONTOLOGY_FILE: &str = "ontology.yaml";

/// Resolves filesystem locations for one [`PathContext`].
#[derive(Debug, Clone)]
pub struct PathResolver<'a> {
    ctx: &'a PathContext,
}

impl<'a> PathResolver<'a> {
    pub fn new(ctx: &'a PathContext) -> Self {
        Self { ctx }
    }

    /// Directory holding memories of `namespace` at `scope`.
    ///
    /// Any syntactically valid namespace string resolves — namespace is
    /// data, not a closed enum; vocabulary enforcement belongs to the
    /// ontology system.
    pub fn memory_dir(&self, namespace: &str, scope: Scope) -> PathBuf {
        match self.ctx.scheme {
            PathScheme::Legacy => match scope {
                Scope::User => self.org_root().join(namespace).join("user"),
                Scope::Shared => self.org_root().join(namespace).join("shared"),
                Scope::Project => self
                    .ctx
                    .project_dir
                    .join(PROJECT_ROOT)
                    .join(namespace)
                    .join("project"),
            },
            PathScheme::V2 => match scope {
                // Project-scoped memories live under the project partition.
                Scope::Project => self.org_root().join(&self.ctx.project).join(namespace),
                // User and shared memories are org-wide under v2.
                Scope::User | Scope::Shared => self.org_root().join(namespace),
            },
        }
    }

    /// Full path for a memory file. Filename collision avoidance is the
    /// caller's responsibility (names embed the record's UUID).
    pub fn memory_path(&self, namespace: &str, filename: &str, scope: Scope) -> PathBuf {
        self.memory_dir(namespace, scope).join(filename)
    }

    /// Directories to search for `namespace`, most specific first:
    /// project scope, then org-wide shared, then user-global.
    ///
    /// The order is a contract — consumers rank recall results by it.
    pub fn search_paths(
        &self,
        namespace: &str,
        include_user: bool,
        include_project: bool,
        include_org: bool,
    ) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if include_project {
            paths.push(self.memory_dir(namespace, Scope::Project));
        }
        if include_org {
            push_unique(&mut paths, self.memory_dir(namespace, Scope::Shared));
        }
        if include_user {
            // Under v2 the user dir coincides with the shared dir.
            push_unique(&mut paths, self.memory_dir(namespace, Scope::User));
        }
        paths
    }

    /// Blackboard scratch directory for `scope`.
    pub fn blackboard_dir(&self, scope: Scope) -> PathBuf {
        self.memory_dir(BLACKBOARD_NS, scope)
    }

    /// Ontology file candidates in precedence order: project-local, then
    /// user-global, then the bundled default. Callers load the first file
    /// that exists.
    pub fn ontology_paths(&self) -> Vec<PathBuf> {
        vec![
            self.ctx.project_dir.join(PROJECT_ROOT).join(ONTOLOGY_FILE),
            self.ctx.store_root.join(ONTOLOGY_FILE),
            self.ctx.store_root.join("ontology.default.yaml"),
        ]
    }

    /// Every directory that could contain memories, across both schemes.
    ///
    /// Full-corpus passes (validate, check, decay) walk all of these so a
    /// corpus with a historical mix of legacy and v2 files is fully
    /// covered no matter which scheme the context is set to.
    pub fn all_memory_roots(&self) -> Vec<PathBuf> {
        vec![
            self.org_root(),
            self.ctx.project_dir.join(PROJECT_ROOT),
        ]
    }

    /// `{store_root}/{org}` — shared base of every home-rooted layout.
    fn org_root(&self) -> PathBuf {
        self.ctx.store_root.join(&self.ctx.org)
    }
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}
