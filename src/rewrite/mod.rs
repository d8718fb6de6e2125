//! Include rewriting driven by a match table.
//!
//! Rewriting is split in two phases. [`plan_rewrites`] reads every
//! qualifying file and stages its new contents in memory without writing
//! anything; [`RewritePlan::commit`] then writes every staged file back.
//! A dry run is a plan that is never committed.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{PathTranslation, RewriteConfig};
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::matcher::MatchTable;

/// New contents for one file, staged before commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Full rewritten contents.
    pub contents: String,
    /// Source header paths whose quoted includes were replaced.
    pub replaced: Vec<String>,
}

impl StagedFile {
    /// Returns `true` if at least one include was replaced.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.replaced.is_empty()
    }
}

/// Every qualifying file under a rewrite root with its staged contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewritePlan {
    /// Staged files in walk order.
    pub files: Vec<StagedFile>,
}

impl RewritePlan {
    /// Files whose contents differ from what is on disk.
    pub fn changed(&self) -> impl Iterator<Item = &StagedFile> {
        self.files.iter().filter(|f| f.is_changed())
    }

    /// Writes every staged file back to its path, changed or not.
    ///
    /// Writes are in place with no backup; a failure part-way leaves the
    /// earlier files written.
    ///
    /// # Errors
    ///
    /// Returns the first write failure.
    pub fn commit(&self, ctx: &ServiceContext) -> Result<usize> {
        for file in &self.files {
            ctx.fs.write(&file.path, &file.contents).map_err(|e| Error::io(&file.path, e))?;
        }
        info!(
            written = self.files.len(),
            changed = self.changed().count(),
            "committed rewritten sources"
        );
        Ok(self.files.len())
    }
}

/// Builds the angle-bracketed include lines that replace one quoted include.
///
/// Lines are joined by `\n` with no trailing terminator.
#[must_use]
pub fn replacement_block(targets: &[String], translation: &PathTranslation) -> String {
    targets
        .iter()
        .map(|target| format!("#include <{}>", translation.translate(target)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces every `#include "<source>"` for each table key found in
/// `content`, in table order.
///
/// Returns the new content and the keys that were replaced.
#[must_use]
pub fn rewrite_content(
    content: &str,
    table: &MatchTable,
    translation: &PathTranslation,
) -> (String, Vec<String>) {
    let mut rewritten = content.to_string();
    let mut replaced = Vec::new();
    for (source, targets) in table.iter() {
        if targets.is_empty() {
            continue;
        }
        let directive = format!("#include \"{source}\"");
        if rewritten.contains(&directive) {
            rewritten = rewritten.replace(&directive, &replacement_block(targets, translation));
            replaced.push(source.clone());
        }
    }
    (rewritten, replaced)
}

/// Reads every file under `root` whose suffix qualifies and stages its
/// rewritten contents.
///
/// Nothing is written. Any read failure aborts the whole plan.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a file cannot be read.
pub fn plan_rewrites(
    ctx: &ServiceContext,
    root: &Path,
    table: &MatchTable,
    config: &RewriteConfig,
) -> Result<RewritePlan> {
    let files = ctx.fs.walk_files(root, &[]).map_err(|e| Error::walk(root, e))?;

    let mut plan = RewritePlan::default();
    for relative in files {
        let qualifies = relative
            .file_name()
            .is_some_and(|name| config.is_rewritable(&name.to_string_lossy()));
        if !qualifies {
            continue;
        }

        let path = root.join(&relative);
        let content = ctx.fs.read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let (contents, replaced) = rewrite_content(&content, table, &config.translation);
        if !replaced.is_empty() {
            debug!(file = %relative.display(), includes = replaced.len(), "staged include rewrite");
        }
        plan.files.push(StagedFile { path, contents, replaced });
    }

    info!(
        root = %root.display(),
        files = plan.files.len(),
        changed = plan.changed().count(),
        "planned include rewrites"
    );
    Ok(plan)
}

/// Plans and immediately commits a rewrite of `root`.
///
/// # Errors
///
/// Returns an error if planning or committing fails.
pub fn rewrite_tree(
    ctx: &ServiceContext,
    root: &Path,
    table: &MatchTable,
    config: &RewriteConfig,
) -> Result<RewritePlan> {
    let plan = plan_rewrites(ctx, root, table, config)?;
    plan.commit(ctx)?;
    Ok(plan)
}
