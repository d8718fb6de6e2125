//! Recording session owning the filesystem cassette recorder.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// Manages the `CassetteRecorder` for one recording session.
///
/// Cassettes are stored in a timestamped directory under the requested base
/// directory, one file per port.
pub struct RecordingSession {
    /// Recorder for filesystem interactions.
    pub fs: Arc<Mutex<CassetteRecorder>>,
    /// Output directory containing all cassette files.
    output_dir: PathBuf,
}

impl RecordingSession {
    /// Create a new recording session under `base`.
    ///
    /// Creates directory `<base>/<timestamp>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The cassette directory already exists
    /// - The directory cannot be created
    pub fn new(base: &Path) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let output_dir = base.join(&timestamp);

        if output_dir.exists() {
            return Err(format!("Cassette directory already exists: {}", output_dir.display()));
        }

        std::fs::create_dir_all(&output_dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let fs_path = output_dir.join("fs.cassette.yaml");
        let fs = Arc::new(Mutex::new(CassetteRecorder::new(fs_path, format!("{timestamp}-fs"))));

        Ok(Self { fs, output_dir })
    }

    /// Output directory of this session.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Finish all recorders and write cassette files to disk.
    ///
    /// Consumes the session. Every adapter holding a recorder must have been
    /// dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if a recorder is still shared or a cassette file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.fs)
            .map_err(|_| "Recording adapter for fs still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for fs poisoned: {e}"))?;
        recorder.finish().map_err(|e| format!("Failed to write fs cassette: {e}"))?;
        Ok(self.output_dir)
    }
}
