//! The full migration: scan both universes, cross-map, rewrite.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ResolvedRoots, RewriteConfig, ScanConfig, DEFAULT_MAPPING_FILE};
use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::matcher::{cross_map, MatchTable, StructPolicy};
use crate::rewrite::{plan_rewrites, RewritePlan};
use crate::scan::{scan_tree, DeclarationMapping};
use crate::snapshot;

/// Where the source universe's declarations come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUniverse {
    /// Scan this header tree.
    Scan(PathBuf),
    /// Load a previously written mapping snapshot.
    Snapshot(PathBuf),
}

impl SourceUniverse {
    /// Picks the source for `roots`: the engine tree when one was given,
    /// otherwise `snapshot`, otherwise `<bindings>/output_header_mapping.json`.
    #[must_use]
    pub fn for_roots(roots: &ResolvedRoots, snapshot: Option<PathBuf>) -> Self {
        match (&roots.engine, snapshot) {
            (Some(engine), _) => Self::Scan(engine.clone()),
            (None, Some(path)) => Self::Snapshot(path),
            (None, None) => Self::Snapshot(roots.bindings.join(DEFAULT_MAPPING_FILE)),
        }
    }

    fn load(
        &self,
        ctx: &ServiceContext,
        scan: &ScanConfig,
        extractor: &dyn Extractor,
    ) -> Result<DeclarationMapping> {
        match self {
            Self::Scan(root) => scan_tree(ctx, root, scan, extractor),
            Self::Snapshot(path) => {
                if !ctx.fs.exists(path) {
                    return Err(Error::Usage(format!(
                        "no engine snapshot at {}; pass ENGINE_DIR or --source-mapping",
                        path.display()
                    )));
                }
                snapshot::load_mapping(ctx, path)
            }
        }
    }
}

/// Knobs for one [`convert`] run.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Scan settings for both universes.
    pub scan: ScanConfig,
    /// Rewrite settings for the module tree.
    pub rewrite: RewriteConfig,
    /// Struct comparison policy for the cross-mapper.
    pub policy: StructPolicy,
    /// Where to checkpoint the match table, if anywhere.
    pub matches_output: Option<PathBuf>,
    /// Stage rewrites without writing anything.
    pub dry_run: bool,
}

/// What a [`convert`] run found and did.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    /// Headers in the source universe.
    pub source_headers: usize,
    /// Headers in the target universe.
    pub target_headers: usize,
    /// The cross-mapping used for rewriting.
    pub matches: MatchTable,
    /// Staged contents of every qualifying module file.
    pub plan: RewritePlan,
    /// `false` for dry runs.
    pub committed: bool,
}

/// Runs the whole pipeline against `module`.
///
/// Every read happens before the first write: both universes are built, the
/// match table is computed and every rewrite is staged in memory before the
/// match table checkpoint and the module files are written. A dry run writes
/// nothing at all.
///
/// # Errors
///
/// Returns the first usage, I/O or snapshot error encountered.
pub fn convert(
    ctx: &ServiceContext,
    module: &Path,
    bindings: &Path,
    source: &SourceUniverse,
    extractor: &dyn Extractor,
    options: &ConvertOptions,
) -> Result<ConvertOutcome> {
    let source_mapping = source.load(ctx, &options.scan, extractor)?;
    let target_mapping = scan_tree(ctx, bindings, &options.scan, extractor)?;

    let matches = cross_map(&source_mapping, &target_mapping, options.policy);
    let plan = plan_rewrites(ctx, module, &matches, &options.rewrite)?;

    let committed = !options.dry_run;
    if committed {
        if let Some(path) = &options.matches_output {
            snapshot::save_matches(ctx, path, &matches)?;
        }
        plan.commit(ctx)?;
    }
    info!(
        module = %module.display(),
        changed = plan.changed().count(),
        dry_run = options.dry_run,
        "conversion finished"
    );

    Ok(ConvertOutcome {
        source_headers: source_mapping.len(),
        target_headers: target_mapping.len(),
        matches,
        plan,
        committed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::extract::LexicalExtractor;

    fn tree() -> MemoryFileSystem {
        MemoryFileSystem::with_files([
            ("/godot/scene/3d/node_3d.h", "class Node3D : public Node {"),
            ("/godot/core/typedefs.h", "#define likely(x) x\n"),
            ("/godot/tests/test_node.h", "class Node3D {"),
            ("/godot-cpp/gen/include/godot_cpp/classes/node3d.hpp", "class Node3D : public Node {"),
            ("/godot-cpp/include/godot_cpp/core/defs.hpp", "#define likely(x) x\n"),
            ("/module/ik.cpp", "#include \"scene/3d/node_3d.h\"\n#include \"core/typedefs.h\"\n"),
            ("/module/ik.h", "#include \"unrelated.h\"\n"),
        ])
    }

    fn roots(engine: bool) -> ResolvedRoots {
        ResolvedRoots {
            module: PathBuf::from("/module"),
            bindings: PathBuf::from("/godot-cpp"),
            engine: engine.then(|| PathBuf::from("/godot")),
        }
    }

    #[test]
    fn scans_both_trees_and_rewrites_module() {
        let ctx = ServiceContext::with_fs(tree());
        let roots = roots(true);
        let options = ConvertOptions {
            matches_output: Some(PathBuf::from("/header_matches.json")),
            ..ConvertOptions::default()
        };

        let outcome = convert(
            &ctx,
            &roots.module,
            &roots.bindings,
            &SourceUniverse::for_roots(&roots, None),
            &LexicalExtractor,
            &options,
        )
        .unwrap();

        assert_eq!(outcome.source_headers, 2);
        assert_eq!(outcome.target_headers, 2);
        assert!(outcome.committed);
        assert_eq!(
            ctx.fs.read_to_string(Path::new("/module/ik.cpp")).unwrap(),
            "#include <godot_compat/classes/node3d.hpp>\n#include <godot_compat/core/defs.hpp>\n"
        );
        assert!(ctx.fs.exists(Path::new("/header_matches.json")));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let ctx = ServiceContext::with_fs(tree());
        let roots = roots(true);
        let options = ConvertOptions {
            matches_output: Some(PathBuf::from("/header_matches.json")),
            dry_run: true,
            ..ConvertOptions::default()
        };

        let outcome = convert(
            &ctx,
            &roots.module,
            &roots.bindings,
            &SourceUniverse::for_roots(&roots, None),
            &LexicalExtractor,
            &options,
        )
        .unwrap();

        assert!(!outcome.committed);
        assert_eq!(outcome.plan.changed().count(), 1);
        assert!(!ctx.fs.exists(Path::new("/header_matches.json")));
        assert!(ctx
            .fs
            .read_to_string(Path::new("/module/ik.cpp"))
            .unwrap()
            .starts_with("#include \"scene/3d/node_3d.h\""));
    }

    #[test]
    fn default_snapshot_lives_in_bindings_dir() {
        let roots = roots(false);
        assert_eq!(
            SourceUniverse::for_roots(&roots, None),
            SourceUniverse::Snapshot(PathBuf::from("/godot-cpp/output_header_mapping.json"))
        );
    }

    #[test]
    fn missing_snapshot_is_a_usage_error_before_any_write() {
        let ctx = ServiceContext::with_fs(tree());
        let roots = roots(false);
        let err = convert(
            &ctx,
            &roots.module,
            &roots.bindings,
            &SourceUniverse::for_roots(&roots, None),
            &LexicalExtractor,
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Usage(_)));
        assert!(ctx
            .fs
            .read_to_string(Path::new("/module/ik.cpp"))
            .unwrap()
            .contains("\"scene/3d/node_3d.h\""));
    }

    #[test]
    fn loads_source_universe_from_snapshot() {
        let fs = tree();
        let ctx = ServiceContext::with_fs(fs);
        let engine = scan_tree(&ctx, Path::new("/godot"), &ScanConfig::default(), &LexicalExtractor)
            .unwrap();
        snapshot::save_mapping(&ctx, Path::new("/godot-cpp/output_header_mapping.json"), &engine)
            .unwrap();

        let roots = roots(false);
        let outcome = convert(
            &ctx,
            &roots.module,
            &roots.bindings,
            &SourceUniverse::for_roots(&roots, None),
            &LexicalExtractor,
            &ConvertOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.matches.len(), 2);
    }
}
