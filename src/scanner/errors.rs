//! Scanner errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for scanner operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors opening or reading a translation project.
///
/// A missing book is not an error; it only means no evidence for that book.
/// A book file that is present but cannot be read is.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Project directory not found: {0}")]
    ProjectNotFound(PathBuf),

    #[error("Project path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to list project directory {path}: {source}")]
    ListFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read book file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ScanError::ProjectNotFound(_) => "VRS_PROJECT_NOT_FOUND",
            ScanError::NotADirectory(_) => "VRS_PROJECT_NOT_A_DIRECTORY",
            ScanError::ListFailed { .. } => "VRS_PROJECT_LIST_FAILED",
            ScanError::ReadFailed { .. } => "VRS_BOOK_READ_FAILED",
        }
    }
}
