//! Filesystem port for file I/O and tree walking.

use std::path::{Path, PathBuf};

use crate::error::PortError;

/// Provides filesystem access for reading, writing and walking header trees.
///
/// Abstracting the filesystem allows deterministic replay and testing
/// without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Returns `true` if the path exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Lists every regular file under `root`, recursively, as paths relative
    /// to `root`, sorted.
    ///
    /// A directory whose name is in `excluded` is pruned together with its
    /// whole subtree, at any depth. The root itself is never pruned.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` or any visited directory cannot be read.
    fn walk_files(&self, root: &Path, excluded: &[String]) -> Result<Vec<PathBuf>, PortError>;
}
