//! Error taxonomy for the amalgamation pipeline
//!
//! None of these are recovered locally: every error aborts the run and leaves
//! the tree in whatever state it had reached.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AmalgamError {
    /// The root or a subdirectory could not be listed
    #[error("cannot read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading or writing a single file failed
    #[error("I/O error on {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The implementation file survived after its content was merged
    #[error("failed to delete {} after merging it: {source}", .path.display())]
    DeletionFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AmalgamError {
    pub fn directory(path: &Path, source: io::Error) -> Self {
        Self::DirectoryUnreadable {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn file_io(path: &Path, source: io::Error) -> Self {
        Self::FileIo {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn deletion(path: &Path, source: io::Error) -> Self {
        Self::DeletionFailed {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Stable short code, used in rendered error items
    pub fn code(&self) -> &'static str {
        match self {
            Self::DirectoryUnreadable { .. } => "DIRECTORY_UNREADABLE",
            Self::FileIo { .. } => "FILE_IO",
            Self::DeletionFailed { .. } => "DELETION_FAILED",
        }
    }
}

pub type Result<T> = std::result::Result<T, AmalgamError>;
