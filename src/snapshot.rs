//! JSON snapshots of declaration mappings and match tables.
//!
//! Snapshots are written with four-space indentation and go through the
//! `FileSystem` port so they work with live, replaying and recording
//! adapters.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::context::ServiceContext;
use crate::error::{Error, Result};
use crate::matcher::MatchTable;
use crate::scan::DeclarationMapping;

/// Serializes `value` as indented JSON.
///
/// # Errors
///
/// Returns [`Error::Serialize`] if `value` cannot be represented as JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn load<T: DeserializeOwned>(ctx: &ServiceContext, path: &Path) -> Result<T> {
    let text = ctx.fs.read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text)
        .map_err(|source| Error::Snapshot { path: path.to_path_buf(), source })
}

fn save<T: Serialize>(ctx: &ServiceContext, path: &Path, value: &T) -> Result<()> {
    let json = to_json(value)?;
    ctx.fs.write(path, &json).map_err(|e| Error::io(path, e))
}

/// Loads a declaration mapping snapshot.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a mapping.
pub fn load_mapping(ctx: &ServiceContext, path: &Path) -> Result<DeclarationMapping> {
    load(ctx, path)
}

/// Writes a declaration mapping snapshot.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_mapping(ctx: &ServiceContext, path: &Path, mapping: &DeclarationMapping) -> Result<()> {
    save(ctx, path, mapping)
}

/// Loads a match table snapshot, dropping any empty target lists.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a match table.
pub fn load_matches(ctx: &ServiceContext, path: &Path) -> Result<MatchTable> {
    load::<MatchTable>(ctx, path).map(MatchTable::into_sparse)
}

/// Writes a match table snapshot.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_matches(ctx: &ServiceContext, path: &Path, table: &MatchTable) -> Result<()> {
    save(ctx, path, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::extract::DeclarationSet;

    fn sample_mapping() -> DeclarationMapping {
        [
            (
                "core/object/object.h".to_string(),
                DeclarationSet {
                    classes: vec!["Object".into(), "ObjectDB".into(), "Object".into()],
                    structs: vec!["MethodInfo".into()],
                    defines: vec!["GDCLASS".into(), "ADD_SIGNAL".into()],
                },
            ),
            ("./typedefs.h".to_string(), DeclarationSet::default()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn mapping_round_trips_exactly() {
        let ctx = ServiceContext::with_fs(MemoryFileSystem::new());
        let path = Path::new("/out/output_header_mapping.json");
        let mapping = sample_mapping();

        save_mapping(&ctx, path, &mapping).unwrap();
        let loaded = load_mapping(&ctx, path).unwrap();
        assert_eq!(loaded, mapping);
        assert_eq!(
            loaded.get("core/object/object.h").unwrap().classes,
            vec!["Object", "ObjectDB", "Object"]
        );
    }

    #[test]
    fn snapshot_uses_four_space_indent() {
        let mut table = MatchTable::new();
        table.push("a.h", "b.h");
        let json = to_json(&table).unwrap();
        assert_eq!(json, "{\n    \"a.h\": [\n        \"b.h\"\n    ]\n}");
    }

    #[test]
    fn mapping_json_has_three_array_fields() {
        let json = to_json(&sample_mapping()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &value["./typedefs.h"];
        assert_eq!(entry, &serde_json::json!({"classes": [], "structs": [], "defines": []}));
    }

    #[test]
    fn malformed_mapping_is_a_snapshot_error() {
        let fs = MemoryFileSystem::with_files([(
            "/m.json",
            r#"{"a.h": {"classes": [], "structs": []}}"#,
        )]);
        let ctx = ServiceContext::with_fs(fs);
        let err = load_mapping(&ctx, Path::new("/m.json")).unwrap_err();
        assert!(matches!(err, Error::Snapshot { .. }));
        assert!(err.to_string().contains("/m.json"));
    }

    #[test]
    fn missing_snapshot_is_an_io_error() {
        let ctx = ServiceContext::with_fs(MemoryFileSystem::new());
        let err = load_matches(&ctx, Path::new("/header_matches.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn matches_round_trip() {
        let ctx = ServiceContext::with_fs(MemoryFileSystem::new());
        let mut table = MatchTable::new();
        table.push("core/object/object.h", "gen/include/godot_cpp/classes/object.hpp");
        table.push("core/object/object.h", "include/godot_cpp/core/object.hpp");
        save_matches(&ctx, Path::new("/m.json"), &table).unwrap();
        assert_eq!(load_matches(&ctx, Path::new("/m.json")).unwrap(), table);
    }
}
