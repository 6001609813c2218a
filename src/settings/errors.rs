//! Settings emitter errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for settings operations
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Errors writing or reading per-translation records
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Project directory not found: {0}")]
    ProjectNotFound(PathBuf),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid determination record {path}: {reason}")]
    InvalidRecord { path: PathBuf, reason: String },

    #[error("Failed to serialize determination record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SettingsError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SettingsError::ProjectNotFound(_) => "VRS_SETTINGS_PROJECT_NOT_FOUND",
            SettingsError::Write { .. } => "VRS_SETTINGS_WRITE_FAILED",
            SettingsError::Read { .. } => "VRS_SETTINGS_READ_FAILED",
            SettingsError::InvalidRecord { .. } => "VRS_SETTINGS_INVALID_RECORD",
            SettingsError::Serialize(_) => "VRS_SETTINGS_SERIALIZE_FAILED",
        }
    }
}
