//! Error type shared by the scanning, matching and rewriting stages.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the header remapping pipeline.
///
/// Every variant is fatal: nothing is retried and nothing is downgraded to a
/// warning. Empty-declaration diagnostics are logged, not returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Invocation was missing a required root or named one that does not exist.
    #[error("usage error: {0}")]
    Usage(String),

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying port error.
        source: PortError,
    },

    /// A directory tree could not be walked.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        /// Root of the walk.
        path: PathBuf,
        /// Underlying port error.
        source: PortError,
    },

    /// A persisted mapping or match table did not have the expected shape.
    #[error("malformed snapshot {}: {source}", path.display())]
    Snapshot {
        /// Snapshot file that failed to parse.
        path: PathBuf,
        /// JSON parse error.
        source: serde_json::Error,
    },

    /// An in-memory value could not be serialized.
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Wraps a port error raised while reading or writing `path`.
    pub fn io(path: impl Into<PathBuf>, source: PortError) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Wraps a port error raised while walking the tree rooted at `path`.
    pub fn walk(path: impl Into<PathBuf>, source: PortError) -> Self {
        Self::Walk { path: path.into(), source }
    }
}

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;
