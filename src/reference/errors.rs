//! Reference data error types
//!
//! The six reference files are a fixed, versioned asset. Anything wrong with
//! them, or with a persisted divergence table, is a configuration error:
//! the process must stop before any translation is evaluated.
//!
//! Error codes:
//! - VRS_REFERENCE_MISSING (FATAL)
//! - VRS_REFERENCE_MALFORMED (FATAL)
//! - VRS_REFERENCE_BOOK_MISSING (FATAL)
//! - VRS_TABLE_MALFORMED (FATAL)
//! - VRS_TABLE_STALE (FATAL)
//! - VRS_TABLE_IO (FATAL)

use std::fmt;
use std::io;

/// Severity levels for reference errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Reference-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceErrorCode {
    /// A scheme's reference file is absent or unreadable
    VrsReferenceMissing,
    /// A reference line cannot be parsed
    VrsReferenceMalformed,
    /// A reference file omits a required book
    VrsReferenceBookMissing,
    /// A persisted divergence table is not valid
    VrsTableMalformed,
    /// A persisted divergence table was built from different reference files
    VrsTableStale,
    /// A divergence table artifact could not be read or written
    VrsTableIo,
}

impl ReferenceErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ReferenceErrorCode::VrsReferenceMissing => "VRS_REFERENCE_MISSING",
            ReferenceErrorCode::VrsReferenceMalformed => "VRS_REFERENCE_MALFORMED",
            ReferenceErrorCode::VrsReferenceBookMissing => "VRS_REFERENCE_BOOK_MISSING",
            ReferenceErrorCode::VrsTableMalformed => "VRS_TABLE_MALFORMED",
            ReferenceErrorCode::VrsTableStale => "VRS_TABLE_STALE",
            ReferenceErrorCode::VrsTableIo => "VRS_TABLE_IO",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

impl fmt::Display for ReferenceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Reference error with context
#[derive(Debug)]
pub struct ReferenceError {
    code: ReferenceErrorCode,
    message: String,
    /// Reference file or artifact the error is about
    path: Option<String>,
    /// 1-based line number inside `path`
    line: Option<usize>,
    source: Option<io::Error>,
}

impl ReferenceError {
    fn new(code: ReferenceErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            path: None,
            line: None,
            source: None,
        }
    }

    /// A reference file could not be found or read
    pub fn missing(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        Self {
            path: Some(path.clone()),
            source: Some(source),
            ..Self::new(
                ReferenceErrorCode::VrsReferenceMissing,
                format!("Reference file '{}' cannot be read", path),
            )
        }
    }

    /// A reference line is malformed
    pub fn malformed(path: impl Into<String>, line: usize, reason: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: Some(path.clone()),
            line: Some(line),
            ..Self::new(
                ReferenceErrorCode::VrsReferenceMalformed,
                format!("{}:{}: {}", path, line, reason.into()),
            )
        }
    }

    /// A required book is not defined by a reference file
    pub fn book_missing(path: impl Into<String>, book: &str) -> Self {
        let path = path.into();
        Self {
            path: Some(path.clone()),
            ..Self::new(
                ReferenceErrorCode::VrsReferenceBookMissing,
                format!("Reference file '{}' does not define book {}", path, book),
            )
        }
    }

    /// A divergence table artifact is invalid
    pub fn table_malformed(reason: impl Into<String>) -> Self {
        Self::new(ReferenceErrorCode::VrsTableMalformed, reason.into())
    }

    /// A divergence table artifact does not match the reference files
    pub fn table_stale(file: impl Into<String>, expected: &str, actual: &str) -> Self {
        let file = file.into();
        Self {
            path: Some(file.clone()),
            ..Self::new(
                ReferenceErrorCode::VrsTableStale,
                format!(
                    "Divergence table was built from a different '{}' (recorded {}, found {})",
                    file, expected, actual
                ),
            )
        }
    }

    /// A divergence table artifact could not be read or written
    pub fn table_io(path: impl Into<String>, message: impl Into<String>, source: io::Error) -> Self {
        Self {
            path: Some(path.into()),
            source: Some(source),
            ..Self::new(ReferenceErrorCode::VrsTableIo, message.into())
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ReferenceErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending file, if known
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns the offending line, if known
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Reference errors always abort the run
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity(), self.code.code(), self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ReferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for reference operations
pub type ReferenceResult<T> = Result<T, ReferenceError>;
