//! Pipeline configuration: scan exclusions, file suffixes, path translation
//! and the resolved directory roots a run operates on.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::ports::FileSystem;

/// Directory names never descended into while scanning.
pub const DEFAULT_EXCLUDED_DIRS: [&str; 4] = ["thirdparty", "tests", "test", "misc"];

/// Suffixes of files that are scanned for declarations.
pub const HEADER_SUFFIXES: [&str; 2] = [".h", ".hpp"];

/// Suffixes of files whose include directives are rewritten.
pub const REWRITE_SUFFIXES: [&str; 3] = [".cpp", ".h", ".hpp"];

/// Default snapshot file for a scanned declaration mapping.
pub const DEFAULT_MAPPING_FILE: &str = "output_header_mapping.json";

/// Default snapshot file for a match table.
pub const DEFAULT_MATCHES_FILE: &str = "header_matches.json";

/// Controls which files the tree scanner visits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Directory names pruned at any depth.
    pub excluded_dirs: Vec<String>,
    /// File name suffixes treated as headers.
    pub header_suffixes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(ToString::to_string).collect(),
            header_suffixes: HEADER_SUFFIXES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ScanConfig {
    /// Replaces the exclusion list, keeping the default suffixes.
    #[must_use]
    pub fn with_excluded(mut self, excluded: Vec<String>) -> Self {
        self.excluded_dirs = excluded;
        self
    }

    /// Returns `true` if `file_name` ends in one of the header suffixes.
    #[must_use]
    pub fn is_header(&self, file_name: &str) -> bool {
        self.header_suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }
}

/// Ordered substitutions applied to a matched target path before it is
/// emitted as an angle-bracketed include.
///
/// Each rule replaces every occurrence of `from` with `to`, in rule order,
/// so an earlier rule's output is visible to later rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTranslation {
    rules: Vec<(String, String)>,
}

impl Default for PathTranslation {
    /// Generated and hand-written godot-cpp include trees both map onto the
    /// `godot_compat/` include convention.
    fn default() -> Self {
        Self::new([
            ("gen/include/godot_cpp/", "godot_compat/"),
            ("include/godot_cpp/", "godot_compat/"),
        ])
    }
}

impl PathTranslation {
    /// Builds a translation from `(from, to)` pairs.
    pub fn new<F, T>(rules: impl IntoIterator<Item = (F, T)>) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        Self { rules: rules.into_iter().map(|(f, t)| (f.into(), t.into())).collect() }
    }

    /// Translation that leaves every path untouched.
    #[must_use]
    pub fn identity() -> Self {
        Self { rules: Vec::new() }
    }

    /// Applies every rule to `path`.
    #[must_use]
    pub fn translate(&self, path: &str) -> String {
        self.rules.iter().fold(path.to_string(), |acc, (from, to)| acc.replace(from.as_str(), to))
    }
}

/// Controls which files the rewriter touches and how target paths are spelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// File name suffixes whose includes are rewritten.
    pub suffixes: Vec<String>,
    /// Target path translation.
    pub translation: PathTranslation,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            suffixes: REWRITE_SUFFIXES.iter().map(ToString::to_string).collect(),
            translation: PathTranslation::default(),
        }
    }
}

impl RewriteConfig {
    /// Returns `true` if `file_name` should be rewritten.
    #[must_use]
    pub fn is_rewritable(&self, file_name: &str) -> bool {
        self.suffixes.iter().any(|s| file_name.ends_with(s.as_str()))
    }
}

/// Absolute directory roots for one `convert` run.
///
/// Built once at the command layer so the scanner and rewriter never consult
/// the process working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoots {
    /// Tree whose include directives are rewritten.
    pub module: PathBuf,
    /// Target universe: the binding headers includes are redirected to.
    pub bindings: PathBuf,
    /// Source universe to scan; `None` means a snapshot is loaded instead.
    pub engine: Option<PathBuf>,
}

impl ResolvedRoots {
    /// Resolves each argument against `base` and checks that it exists.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Usage`] naming the first root that does not exist.
    pub fn resolve(
        fs: &dyn FileSystem,
        base: &Path,
        module: &Path,
        bindings: &Path,
        engine: Option<&Path>,
    ) -> Result<Self> {
        Ok(Self {
            module: resolve_root(fs, base, module, "MODULE_DIR")?,
            bindings: resolve_root(fs, base, bindings, "BINDINGS_DIR")?,
            engine: engine.map(|e| resolve_root(fs, base, e, "ENGINE_DIR")).transpose()?,
        })
    }
}

/// Joins `arg` onto `base` (absolute arguments win) and checks existence.
///
/// # Errors
///
/// Returns [`Error::Usage`] if the resolved directory does not exist.
pub fn resolve_root(fs: &dyn FileSystem, base: &Path, arg: &Path, label: &str) -> Result<PathBuf> {
    let root = base.join(arg);
    if !fs.exists(&root) {
        return Err(Error::Usage(format!("{label} does not exist: {}", root.display())));
    }
    Ok(root)
}
