//! Service context bundling the port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::LiveFileSystem;
use crate::adapters::recording::RecordingFileSystem;
use crate::adapters::replaying::ReplayingFileSystem;
use crate::cassette::format::Cassette;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::ports::filesystem::FileSystem;

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live, replaying,
/// recording, or any caller-supplied filesystem).
pub struct ServiceContext {
    /// Filesystem for file I/O and tree walking.
    pub fs: Box<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a live context backed by the real disk.
    #[must_use]
    pub fn live() -> Self {
        Self { fs: Box::new(LiveFileSystem) }
    }

    /// Creates a context around an arbitrary filesystem implementation.
    #[must_use]
    pub fn with_fs(fs: impl FileSystem + 'static) -> Self {
        Self { fs: Box::new(fs) }
    }

    /// Creates a live context that records every filesystem interaction.
    ///
    /// The returned session must be finished after the context is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the session directory cannot be created.
    pub fn recording_at(base: &Path) -> Result<(Self, RecordingSession), String> {
        let session = RecordingSession::new(base)?;
        let fs = RecordingFileSystem::new(Box::new(LiveFileSystem), Arc::clone(&session.fs));
        Ok((Self { fs: Box::new(fs) }, session))
    }

    /// Creates a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read cassette file {}: {e}", path.display()))?;
        let cassette: Cassette = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse cassette file {}: {e}", path.display()))?;
        let replayer = CassetteReplayer::new(&cassette);
        Ok(Self { fs: Box::new(ReplayingFileSystem::new(replayer)) })
    }
}
