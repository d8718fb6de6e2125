//! Tree scanning: builds the declaration mapping for one header universe.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::extract::{DeclarationSet, Extractor};

/// Declarations of every header in one universe, keyed by
/// `<relative-dir>/<filename>`.
///
/// Keys are kept sorted so the mapping does not depend on traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclarationMapping(BTreeMap<String, DeclarationSet>);

impl DeclarationMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the entry for `path`.
    pub fn insert(&mut self, path: impl Into<String>, declarations: DeclarationSet) {
        self.0.insert(path.into(), declarations);
    }

    /// Declarations recorded for `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&DeclarationSet> {
        self.0.get(path)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &DeclarationSet)> {
        self.0.iter()
    }

    /// Iterates keys in order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Number of headers in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mapping has no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, DeclarationSet)> for DeclarationMapping {
    fn from_iter<I: IntoIterator<Item = (String, DeclarationSet)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Scans every header under `root` and extracts its declarations.
///
/// Directories named in `config.excluded_dirs` are pruned at any depth.
/// Headers with no declarations are logged and still included.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a header cannot be read.
pub fn scan_tree(
    ctx: &ServiceContext,
    root: &Path,
    config: &ScanConfig,
    extractor: &dyn Extractor,
) -> Result<DeclarationMapping> {
    let files =
        ctx.fs.walk_files(root, &config.excluded_dirs).map_err(|e| Error::walk(root, e))?;

    let mut mapping = DeclarationMapping::new();
    for relative in &files {
        let Some(name) = relative.file_name() else {
            continue;
        };
        let file_name = name.to_string_lossy();
        if !config.is_header(&file_name) {
            continue;
        }
        if name.to_str().is_none() {
            warn!(file = %relative.display(), "header name is not valid UTF-8, keyed lossily");
        }

        let full_path = root.join(relative);
        let text = ctx.fs.read_to_string(&full_path).map_err(|e| Error::io(&full_path, e))?;
        let declarations = extractor.extract(&text);
        if declarations.is_empty() {
            warn!(file = %full_path.display(), "header declares no classes, structs or defines");
        }
        debug!(
            file = %relative.display(),
            classes = declarations.classes.len(),
            structs = declarations.structs.len(),
            defines = declarations.defines.len(),
            "extracted declarations"
        );
        mapping.insert(mapping_key(relative, &file_name), declarations);
    }

    info!(root = %root.display(), headers = mapping.len(), "scanned header tree");
    Ok(mapping)
}

/// Builds `<relative-dir>/<filename>`; files directly under the root use `.`
/// as their directory.
fn mapping_key(relative: &Path, file_name: &str) -> String {
    let dir = relative
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| ".".to_string(), |p| p.display().to_string());
    format!("{dir}/{file_name}")
}
