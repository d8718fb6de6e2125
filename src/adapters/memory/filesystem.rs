//! In-memory filesystem adapter.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Filesystem held entirely in memory, keyed by absolute path.
///
/// Directories exist implicitly as prefixes of stored files.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a filesystem pre-populated with `(path, contents)` pairs.
    #[must_use]
    pub fn with_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        let files = files.into_iter().map(|(p, c)| (p.into(), c.into())).collect();
        Self { files: Mutex::new(files) }
    }

    /// Returns the current contents of `path`, if stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().expect("memory fs lock poisoned").get(path).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        self.contents(path).ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        let mut files = self.files.lock().expect("memory fs lock poisoned");
        files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().expect("memory fs lock poisoned");
        files.keys().any(|k| k.starts_with(path))
    }

    fn walk_files(&self, root: &Path, excluded: &[String]) -> Result<Vec<PathBuf>, PortError> {
        if !self.exists(root) {
            return Err(format!("Directory not found: {}", root.display()).into());
        }
        let files = self.files.lock().expect("memory fs lock poisoned");
        let walked = files
            .keys()
            .filter_map(|k| k.strip_prefix(root).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .filter(|rel| !in_excluded_dir(rel, excluded))
            .map(Path::to_path_buf)
            .collect();
        Ok(walked)
    }
}

/// Returns `true` if any directory component of `relative` is excluded.
fn in_excluded_dir(relative: &Path, excluded: &[String]) -> bool {
    relative.parent().is_some_and(|dir| {
        dir.components().any(|c| match c {
            Component::Normal(name) => {
                name.to_str().is_some_and(|n| excluded.iter().any(|x| x == n))
            }
            _ => false,
        })
    })
}
