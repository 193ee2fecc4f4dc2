//! Tree walker
//!
//! Uses walkdir to enumerate every regular file under a root. The full list is
//! collected before any action runs, so actions are free to delete files.

use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::WalkDir;

use crate::core::error::{AmalgamError, Result};

/// Every regular file under `root`, depth-first, sorted by name per directory.
///
/// Directories and symlinks are never returned.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|e| AmalgamError::directory(root, e))?;
    if !metadata.is_dir() {
        return Err(AmalgamError::directory(
            root,
            io::Error::new(io::ErrorKind::Other, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            AmalgamError::directory(&path, e.into())
        })?;

        if entry.file_type().is_file() {
            trace!(path = %entry.path().display(), "visit");
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Call `action` once per file under `root`, stopping at the first error
pub fn for_each_file<F>(root: &Path, mut action: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    for path in collect_files(root)? {
        action(&path)?;
    }
    Ok(())
}
