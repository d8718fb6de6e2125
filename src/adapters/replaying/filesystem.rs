//! Replaying adapter for the `FileSystem` port.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Replays recorded filesystem operations from a cassette.
pub struct ReplayingFileSystem {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingFileSystem {
    /// Creates a new replaying filesystem from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }

    /// Number of recorded interactions not yet replayed.
    ///
    /// # Panics
    ///
    /// Panics if the replayer lock is poisoned.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replayer.lock().expect("replayer lock poisoned").remaining()
    }

    fn next_output(&self, method: &str) -> Result<serde_json::Value, PortError> {
        let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
        let interaction = replayer.try_next_interaction("fs", method)?;
        Ok(interaction.output.clone())
    }
}

/// Extracts a Result from a cassette output JSON value.
///
/// Expects `{"ok": <value>}` or `{"err": "message"}`.
fn extract_result<T: serde::de::DeserializeOwned>(
    output: &serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        let msg = err.as_str().unwrap_or("unknown error").to_string();
        return Err(msg.into());
    }
    let value = output.get("ok").unwrap_or(output);
    serde_json::from_value(value.clone())
        .map_err(|e| format!("{context}: failed to deserialize: {e}").into())
}

impl FileSystem for ReplayingFileSystem {
    fn read_to_string(&self, _path: &Path) -> Result<String, PortError> {
        let output = self.next_output("read_to_string")?;
        extract_result(&output, "fs::read_to_string")
    }

    fn write(&self, _path: &Path, _contents: &str) -> Result<(), PortError> {
        let output = self.next_output("write")?;
        if let Some(err) = output.get("err") {
            let msg = err.as_str().unwrap_or("unknown error").to_string();
            return Err(msg.into());
        }
        Ok(())
    }

    fn exists(&self, _path: &Path) -> bool {
        let output = {
            let mut replayer = self.replayer.lock().expect("replayer lock poisoned");
            replayer.next_interaction("fs", "exists").output.clone()
        };
        output.as_bool().unwrap_or(false)
    }

    fn walk_files(&self, _root: &Path, _excluded: &[String]) -> Result<Vec<PathBuf>, PortError> {
        let output = self.next_output("walk_files")?;
        extract_result(&output, "fs::walk_files")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use chrono::Utc;
    use serde_json::json;

    fn make_replayer(interactions: Vec<Interaction>) -> CassetteReplayer {
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            tool_version: "0.1.0".into(),
            interactions,
        };
        CassetteReplayer::new(&cassette)
    }

    fn fs_interaction(seq: u64, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: "fs".into(), method: method.into(), input: json!({}), output }
    }

    #[test]
    fn replaying_walk_files() {
        let replayer = make_replayer(vec![fs_interaction(
            0,
            "walk_files",
            json!({"ok": ["core/object.h", "version.h"]}),
        )]);
        let fs = ReplayingFileSystem::new(replayer);
        let files = fs.walk_files(Path::new("/engine"), &[]).unwrap();
        assert_eq!(files, vec![PathBuf::from("core/object.h"), PathBuf::from("version.h")]);
        assert_eq!(fs.remaining(), 0);
    }

    #[test]
    fn replaying_read_to_string_error() {
        let replayer = make_replayer(vec![fs_interaction(
            0,
            "read_to_string",
            json!({"err": "file not found"}),
        )]);
        let fs = ReplayingFileSystem::new(replayer);
        let result = fs.read_to_string(Path::new("/missing"));
        assert!(result.unwrap_err().to_string().contains("file not found"));
    }

    #[test]
    fn replaying_write_and_exists() {
        let replayer = make_replayer(vec![
            fs_interaction(0, "write", json!({"ok": null})),
            fs_interaction(1, "exists", json!(true)),
        ]);
        let fs = ReplayingFileSystem::new(replayer);
        assert!(fs.write(Path::new("/a.h"), "x").is_ok());
        assert!(fs.exists(Path::new("/a.h")));
    }

    #[test]
    fn missing_interaction_surfaces_as_error() {
        let fs = ReplayingFileSystem::new(make_replayer(vec![]));
        let err = fs.read_to_string(Path::new("/a.h")).unwrap_err();
        assert!(err.to_string().contains("Cassette exhausted"));
    }
}
