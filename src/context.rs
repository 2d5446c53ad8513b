//! Path resolution environment.
//!
//! A [`PathContext`] captures org, project, home directory, project
//! directory, and the active path scheme. It is built once at the start of
//! an operation and threaded through every call — never re-derived mid-pass,
//! so a long batch run cannot observe inconsistent org/project values if
//! the working directory or git state changes underneath it.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{MnemonicError, Result};
use crate::memory::PathScheme;

/// Fallback org/project identifier when git detection fails.
///
/// This silent default is documented behavior, not an error: a directory
/// with no git remote still gets a working memory store.
pub const DEFAULT_PARTITION: &str = "default";

/// Immutable resolution environment for one operation.
#[derive(Debug, Clone)]
pub struct PathContext {
    /// Organization, derived from the git remote URL.
    pub org: String,
    /// Project, derived from the git repository root directory name.
    pub project: String,
    pub home_dir: PathBuf,
    /// Base of the home-rooted store, `{home}/mnemonic` unless overridden
    /// by `MNEMONIC_ROOT` or the config file.
    pub store_root: PathBuf,
    pub project_dir: PathBuf,
    pub scheme: PathScheme,
}

impl PathContext {
    /// Build a context from explicit values (tests, library callers).
    pub fn new(
        org: impl Into<String>,
        project: impl Into<String>,
        home_dir: impl Into<PathBuf>,
        project_dir: impl Into<PathBuf>,
        scheme: PathScheme,
    ) -> Self {
        let home_dir = home_dir.into();
        let store_root = home_dir.join(crate::paths::HOME_ROOT);
        Self {
            org: org.into(),
            project: project.into(),
            home_dir,
            store_root,
            project_dir: project_dir.into(),
            scheme,
        }
    }

    /// Detect the context from the environment: home directory from the OS,
    /// org/project from git (falling back to [`DEFAULT_PARTITION`]).
    /// `store_root` replaces the `{home}/mnemonic` base when given.
    ///
    /// An unresolvable home directory is the one fatal precondition failure.
    pub fn detect(cwd: &Path, scheme: PathScheme, store_root: Option<PathBuf>) -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| MnemonicError::Context("home directory unresolvable".into()))?;
        let store_root =
            store_root.unwrap_or_else(|| home_dir.join(crate::paths::HOME_ROOT));

        let project_dir = git_toplevel(cwd).unwrap_or_else(|| cwd.to_path_buf());

        let org = git_remote_url(cwd)
            .and_then(|url| org_from_remote(&url))
            .unwrap_or_else(|| DEFAULT_PARTITION.to_string());

        let project = project_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_PARTITION.to_string());

        debug!(org = %org, project = %project, scheme = %scheme, "detected path context");

        Ok(Self {
            org,
            project,
            home_dir,
            store_root,
            project_dir,
            scheme,
        })
    }
}

/// Run `git rev-parse --show-toplevel` in `cwd`. `None` outside a repo.
fn git_toplevel(cwd: &Path) -> Option<PathBuf> {
    let out = Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(cwd)
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let path = String::from_utf8(out.stdout).ok()?;
    let path = path.trim();
    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

/// Run `git remote get-url origin` in `cwd`. `None` when there is no remote.
fn git_remote_url(cwd: &Path) -> Option<String> {
    let out = Command::new("git")
        .args(["remote", "get-url", "origin"])
        .current_dir(cwd)
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let url = String::from_utf8(out.stdout).ok()?;
    let url = url.trim().to_string();
    if url.is_empty() {
        None
    } else {
        Some(url)
    }
}

/// Extract the org segment from a git remote URL.
///
/// Handles both SSH (`git@github.com:org/repo.git`) and HTTPS
/// (`https://github.com/org/repo.git`) forms.
pub fn org_from_remote(url: &str) -> Option<String> {
    let path = if let Some(rest) = url.split_once("://").map(|(_, r)| r) {
        // https://host/org/repo[.git]
        rest.split_once('/').map(|(_, p)| p)?
    } else if let Some((_, rest)) = url.split_once(':') {
        // git@host:org/repo[.git]
        rest
    } else {
        return None;
    };

    let org = path.split('/').next()?.trim();
    if org.is_empty() {
        None
    } else {
        Some(org.to_string())
    }
}
