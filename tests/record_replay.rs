//! Record-replay round-trip integration test.
//!
//! Runs a conversion against a real tree while recording every filesystem
//! interaction, then replays the cassette with no disk access and checks the
//! replayed run sees exactly what the recorded run saw.

use std::fs;
use std::path::Path;

use header_remap::config::{ResolvedRoots, ScanConfig};
use header_remap::context::ServiceContext;
use header_remap::extract::LexicalExtractor;
use header_remap::pipeline::{convert, ConvertOptions, ConvertOutcome, SourceUniverse};
use header_remap::scan::scan_tree;

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn run(ctx: &ServiceContext, root: &Path) -> ConvertOutcome {
    let roots = ResolvedRoots {
        module: root.join("module"),
        bindings: root.join("godot-cpp"),
        engine: Some(root.join("godot")),
    };
    let options = ConvertOptions {
        matches_output: Some(root.join("header_matches.json")),
        ..ConvertOptions::default()
    };
    convert(
        ctx,
        &roots.module,
        &roots.bindings,
        &SourceUniverse::for_roots(&roots, None),
        &LexicalExtractor,
        &options,
    )
    .unwrap()
}

#[test]
fn record_then_replay_produces_identical_outcome() {
    let tree = tempfile::tempdir().unwrap();
    write(tree.path(), "godot/scene/3d/node_3d.h", "class Node3D : public Node {");
    write(tree.path(), "godot-cpp/gen/include/godot_cpp/classes/node3d.hpp", "class Node3D {");
    write(tree.path(), "module/ik.cpp", "#include \"scene/3d/node_3d.h\"\n");

    // Phase 1: record a live run.
    let cassettes = tempfile::tempdir().unwrap();
    let (ctx, session) = ServiceContext::recording_at(cassettes.path()).unwrap();
    let recorded = run(&ctx, tree.path());
    drop(ctx);
    let out_dir = session.finish().expect("recording should finish");
    let cassette = out_dir.join("fs.cassette.yaml");
    assert!(cassette.exists());
    assert_eq!(
        fs::read_to_string(tree.path().join("module/ik.cpp")).unwrap(),
        "#include <godot_compat/classes/node3d.hpp>\n"
    );

    // Phase 2: restore the original source and replay twice.
    write(tree.path(), "module/ik.cpp", "#include \"scene/3d/node_3d.h\"\n");
    for _ in 0..2 {
        let ctx = ServiceContext::replaying(&cassette).unwrap();
        let replayed = run(&ctx, tree.path());
        assert_eq!(replayed.matches, recorded.matches);
        assert_eq!(replayed.plan, recorded.plan);
        assert_eq!(replayed.source_headers, recorded.source_headers);
    }

    // Replaying never touches the disk.
    assert_eq!(
        fs::read_to_string(tree.path().join("module/ik.cpp")).unwrap(),
        "#include \"scene/3d/node_3d.h\"\n"
    );
}

#[test]
fn replayed_scan_survives_removal_of_the_tree() {
    let tree = tempfile::tempdir().unwrap();
    write(tree.path(), "godot/core/object/object.h", "class Object {\n#define GDCLASS(a, b)\n");
    let root = tree.path().join("godot");

    let cassettes = tempfile::tempdir().unwrap();
    let (ctx, session) = ServiceContext::recording_at(cassettes.path()).unwrap();
    let recorded = scan_tree(&ctx, &root, &ScanConfig::default(), &LexicalExtractor).unwrap();
    drop(ctx);
    let cassette = session.finish().unwrap().join("fs.cassette.yaml");

    fs::remove_dir_all(&root).unwrap();

    let ctx = ServiceContext::replaying(&cassette).unwrap();
    let replayed = scan_tree(&ctx, &root, &ScanConfig::default(), &LexicalExtractor).unwrap();
    assert_eq!(replayed, recorded);
}
