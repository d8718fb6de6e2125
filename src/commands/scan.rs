//! `header-remap scan` command.

use std::path::Path;

use crate::config::{resolve_root, ScanConfig};
use crate::context::ServiceContext;
use crate::extract::LexicalExtractor;
use crate::scan::scan_tree;
use crate::snapshot;

/// Execute the `scan` command.
///
/// Scans `root` (relative to `base`) and writes the mapping to `output`
/// (relative to `base`). An empty `exclude` keeps the default exclusions.
///
/// # Errors
///
/// Returns an error string if the root is missing, scanning fails, or the
/// snapshot cannot be written.
pub fn run(
    ctx: &ServiceContext,
    base: &Path,
    root: &Path,
    output: &Path,
    exclude: &[String],
) -> Result<(), String> {
    let root = resolve_root(&*ctx.fs, base, root, "ROOT").map_err(|e| e.to_string())?;
    let config = scan_config(exclude);

    let mapping = scan_tree(ctx, &root, &config, &LexicalExtractor).map_err(|e| e.to_string())?;
    let output = base.join(output);
    snapshot::save_mapping(ctx, &output, &mapping).map_err(|e| e.to_string())?;

    let empty = mapping.iter().filter(|(_, d)| d.is_empty()).count();
    println!("Scanned {} headers ({empty} with no declarations)", mapping.len());
    println!("Written to {}", output.display());
    Ok(())
}

/// Default scan config, with the exclusion list replaced when one was given.
pub(crate) fn scan_config(exclude: &[String]) -> ScanConfig {
    if exclude.is_empty() {
        ScanConfig::default()
    } else {
        ScanConfig::default().with_excluded(exclude.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;

    #[test]
    fn scan_writes_snapshot_relative_to_base() {
        let fs = MemoryFileSystem::with_files([
            ("/work/godot/core/object/object.h", "class Object {\n#define GDCLASS(a, b)\n"),
            ("/work/godot/tests/test_main.h", "class TestMain {"),
        ]);
        let ctx = ServiceContext::with_fs(fs);

        run(&ctx, Path::new("/work"), Path::new("godot"), Path::new("out.json"), &[]).unwrap();

        let mapping = snapshot::load_mapping(&ctx, Path::new("/work/out.json")).unwrap();
        assert_eq!(mapping.len(), 1);
        let decls = mapping.get("core/object/object.h").unwrap();
        assert_eq!(decls.classes, vec!["Object"]);
        assert_eq!(decls.defines, vec!["GDCLASS"]);
    }

    #[test]
    fn explicit_exclusions_replace_defaults() {
        let fs = MemoryFileSystem::with_files([
            ("/work/godot/tests/test_main.h", "class TestMain {"),
            ("/work/godot/editor/editor.h", "class Editor {"),
        ]);
        let ctx = ServiceContext::with_fs(fs);

        run(
            &ctx,
            Path::new("/work"),
            Path::new("godot"),
            Path::new("out.json"),
            &["editor".to_string()],
        )
        .unwrap();

        let mapping = snapshot::load_mapping(&ctx, Path::new("/work/out.json")).unwrap();
        assert!(mapping.get("tests/test_main.h").is_some());
        assert!(mapping.get("editor/editor.h").is_none());
    }

    #[test]
    fn missing_root_is_reported() {
        let ctx = ServiceContext::with_fs(MemoryFileSystem::new());
        let err = run(&ctx, Path::new("/work"), Path::new("godot"), Path::new("o.json"), &[])
            .unwrap_err();
        assert!(err.contains("ROOT does not exist"));
    }
}
