//! Path normalization utilities
//!
//! All path arithmetic here is lexical: nothing touches the filesystem, so
//! include targets do not have to exist. Output paths always use '/'.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Fold `.` and `..` segments without consulting the filesystem.
///
/// `..` at the root stays at the root; a relative path keeps leading `..`.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Make `path` absolute against the current directory and clean it
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(clean(path))
    } else {
        Ok(clean(&std::env::current_dir()?.join(path)))
    }
}

/// Resolve a '/'-separated include path against a base directory
pub fn resolve(base: &Path, include: &str) -> PathBuf {
    let mut joined = base.to_path_buf();
    for segment in include.split(['/', '\\']) {
        if !segment.is_empty() {
            joined.push(segment);
        }
    }
    clean(&joined)
}

/// Express `target` relative to the directory `from`, with '/' separators.
///
/// Both paths are expected to be absolute. Identical paths give "".
pub fn relative_to(from: &Path, target: &Path) -> String {
    let from = clean(from);
    let target = clean(target);
    let from: Vec<Component> = from.components().collect();
    let target: Vec<Component> = target.components().collect();

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from.len() {
        segments.push("..".to_string());
    }
    for component in &target[common..] {
        segments.push(component.as_os_str().to_string_lossy().into_owned());
    }
    segments.join("/")
}

/// Final segment of a '/' or '\' separated path string
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
