//! Core memory type definitions.
//!
//! Defines [`MemoryType`] (the three cognitive memory categories), [`Scope`]
//! (audience boundaries), and [`PathScheme`] (the two coexisting on-disk
//! directory layouts).

use serde::{Deserialize, Serialize};

/// The three cognitive memory types, inspired by cognitive science.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryType {
    /// Facts, knowledge, preferences — slow decay.
    Semantic,
    /// Events, decisions, session logs — fast decay.
    Episodic,
    /// Workflows, patterns, how-to guides — slow decay.
    Procedural,
}

impl MemoryType {
    /// Frontmatter-compatible string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Semantic => "semantic",
            Self::Episodic => "episodic",
            Self::Procedural => "procedural",
        }
    }

    /// All known memory types, for validation and stats enumeration.
    pub const ALL: [MemoryType; 3] = [Self::Semantic, Self::Episodic, Self::Procedural];
}

impl std::fmt::Display for MemoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semantic" => Ok(Self::Semantic),
            "episodic" => Ok(Self::Episodic),
            "procedural" => Ok(Self::Procedural),
            _ => Err(format!("unknown memory type: {s}")),
        }
    }
}

/// Audience scope for a memory.
///
/// Scope is an explicit value threaded through the API, never inferred
/// by string-matching on computed paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Applies to a single user, across all their projects.
    User,
    /// Applies to a single project.
    Project,
    /// Applies organization-wide, typically synced via git.
    Shared,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
            Self::Shared => "shared",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "project" => Ok(Self::Project),
            "shared" => Ok(Self::Shared),
            _ => Err(format!("unknown scope: {s}")),
        }
    }
}

/// On-disk directory layout scheme.
///
/// A single corpus may contain a historical mix of both layouts; every
/// maintenance pass must read both regardless of which scheme produced
/// a given file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathScheme {
    /// Original layout: user memories under the home root, project
    /// memories inside the project's `.mnemonic/` directory.
    Legacy,
    /// Unified layout: everything under the home root, partitioned by
    /// org and project.
    V2,
}

impl PathScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::V2 => "v2",
        }
    }
}

impl std::fmt::Display for PathScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PathScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "v2" => Ok(Self::V2),
            _ => Err(format!("unknown path scheme: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_type_round_trips_through_str() {
        for t in MemoryType::ALL {
            assert_eq!(t.as_str().parse::<MemoryType>().unwrap(), t);
        }
    }

    #[test]
    fn scope_rejects_unknown() {
        assert!("global".parse::<Scope>().is_err());
        assert_eq!("shared".parse::<Scope>().unwrap(), Scope::Shared);
    }

    #[test]
    fn scheme_parses() {
        assert_eq!("legacy".parse::<PathScheme>().unwrap(), PathScheme::Legacy);
        assert_eq!("v2".parse::<PathScheme>().unwrap(), PathScheme::V2);
    }
}
