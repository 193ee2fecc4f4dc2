//! Common utilities: text file I/O with line-ending normalization, hashing

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use xxhash_rust::xxh3::xxh3_64;

use crate::core::error::{AmalgamError, Result};

/// Host line ending
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

static EOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("Invalid EOL_RE regex"));

/// Rewrite every CRLF, CR or LF as the host line ending
pub fn normalize_line_endings(text: &str) -> String {
    EOL_RE.replace_all(text, LINE_ENDING).into_owned()
}

/// Read a text file, normalizing line endings
pub fn read_text_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path).map_err(|e| AmalgamError::file_io(path, e))?;
    Ok(normalize_line_endings(&text))
}

/// Write a text file, normalizing line endings. Returns the bytes written.
pub fn write_text_file(path: &Path, text: &str) -> Result<Vec<u8>> {
    let data = normalize_line_endings(text).into_bytes();
    fs::write(path, &data).map_err(|e| AmalgamError::file_io(path, e))?;
    Ok(data)
}

/// Hex xxh3 hash of bytes
pub fn hash_bytes(data: &[u8]) -> String {
    format!("{:016x}", xxh3_64(data))
}
