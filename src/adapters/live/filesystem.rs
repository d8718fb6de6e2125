//! Live filesystem adapter using `std::fs` and `walkdir`.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::PortError;
use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn walk_files(&self, root: &Path, excluded: &[String]) -> Result<Vec<PathBuf>, PortError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_excluded_dir(e, excluded))
        {
            let entry = entry?;
            // Symlinked files are listed; symlinked directories are not entered.
            if entry.file_type().is_dir() || !entry.path().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(root)?;
            files.push(relative.to_path_buf());
        }
        files.sort();
        Ok(files)
    }
}

/// Returns `true` for directories below the root whose name is excluded.
fn is_excluded_dir(entry: &DirEntry, excluded: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| excluded.iter().any(|x| x == name))
}
