//! Cross-mapping of two declaration universes into a match table.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::extract::DeclarationSet;
use crate::scan::DeclarationMapping;

/// Which target list a source header's struct names are compared against.
///
/// The two policies produce different match tables; neither raises any
/// signal when it diverges from the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StructPolicy {
    /// Source structs are looked up in the target's `defines`.
    #[default]
    AgainstDefines,
    /// Source structs are looked up in the target's `structs`.
    AgainstStructs,
}

impl StructPolicy {
    /// Stable kebab-case name used on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AgainstDefines => "against-defines",
            Self::AgainstStructs => "against-structs",
        }
    }

    fn struct_candidates(self, target: &DeclarationSet) -> &[String] {
        match self {
            Self::AgainstDefines => &target.defines,
            Self::AgainstStructs => &target.structs,
        }
    }
}

impl fmt::Display for StructPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StructPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "against-defines" => Ok(Self::AgainstDefines),
            "against-structs" => Ok(Self::AgainstStructs),
            other => Err(format!(
                "unknown struct policy '{other}' (expected against-defines or against-structs)"
            )),
        }
    }
}

/// Source header path to the target header paths that redeclare any of its
/// names.
///
/// Sparse: a source path without matches has no entry, never an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchTable(BTreeMap<String, Vec<String>>);

impl MatchTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `target` to the matches of `source`.
    pub fn push(&mut self, source: impl Into<String>, target: impl Into<String>) {
        self.0.entry(source.into()).or_default().push(target.into());
    }

    /// Targets matched for `source`.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&[String]> {
        self.0.get(source).map(Vec::as_slice)
    }

    /// Iterates `(source, targets)` in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Number of matched source paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of `(source, target)` pairs.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Drops entries whose target list is empty; loaded snapshots may carry
    /// them even though [`cross_map`] never produces one.
    #[must_use]
    pub fn into_sparse(mut self) -> Self {
        self.0.retain(|_, targets| !targets.is_empty());
        self
    }
}

/// Hash sets over one target header's names, built once per target.
struct TargetIndex<'a> {
    path: &'a str,
    classes: HashSet<&'a str>,
    defines: HashSet<&'a str>,
    struct_candidates: HashSet<&'a str>,
}

impl<'a> TargetIndex<'a> {
    fn new(path: &'a str, decls: &'a DeclarationSet, policy: StructPolicy) -> Self {
        Self {
            path,
            classes: decls.classes.iter().map(String::as_str).collect(),
            defines: decls.defines.iter().map(String::as_str).collect(),
            struct_candidates: policy
                .struct_candidates(decls)
                .iter()
                .map(String::as_str)
                .collect(),
        }
    }

    fn matches(&self, source: &DeclarationSet) -> bool {
        source.classes.iter().any(|c| self.classes.contains(c.as_str()))
            || source.defines.iter().any(|d| self.defines.contains(d.as_str()))
            || source.structs.iter().any(|s| self.struct_candidates.contains(s.as_str()))
    }
}

/// Returns `true` if `source` and `target` share a class, a define, or a
/// struct under `policy`. Names compare case-sensitively, unnormalized.
#[must_use]
pub fn declarations_match(
    source: &DeclarationSet,
    target: &DeclarationSet,
    policy: StructPolicy,
) -> bool {
    TargetIndex::new("", target, policy).matches(source)
}

/// Matches every source header against every target header.
///
/// Each source path lists its matching target paths in the target mapping's
/// key order. Runs in `O(|source| * |target|)` path pairs.
#[must_use]
pub fn cross_map(
    source: &DeclarationMapping,
    target: &DeclarationMapping,
    policy: StructPolicy,
) -> MatchTable {
    let index: Vec<TargetIndex<'_>> =
        target.iter().map(|(path, decls)| TargetIndex::new(path, decls, policy)).collect();

    let mut table = MatchTable::new();
    for (source_path, source_decls) in source.iter() {
        for candidate in &index {
            if candidate.matches(source_decls) {
                table.push(source_path.as_str(), candidate.path);
            }
        }
    }

    info!(
        sources = source.len(),
        targets = target.len(),
        matched = table.len(),
        pairs = table.pair_count(),
        policy = %policy,
        "cross-mapped header universes"
    );
    table
}
