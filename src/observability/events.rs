//! Observable events
//!
//! Events are explicit and typed; the string form is what appears in the
//! `event` field of a log line.

use std::fmt;

/// Observable events during table construction and inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Reference data
    /// One reference scheme file parsed
    ReferenceLoaded,
    /// A reference line was skipped (unknown book code)
    ReferenceLineSkipped,
    /// Reference data rejected (FATAL)
    ReferenceRejected,

    // Divergence table
    /// Divergence table built from reference files
    TableBuilt,
    /// Divergence table loaded from an artifact or the shipped data
    TableLoaded,
    /// Divergence table artifact written
    TableWritten,

    // Scanning
    /// Scan of a translation begins
    ScanStart,
    /// A project file maps to a book that is already present
    DuplicateBookSource,
    /// A book file could not be opened
    BookSourceUnreadable,
    /// Reading a book file failed part way through
    BookSourceReadFailed,

    // Inference
    /// An event narrowed or corroborated the candidate set
    EvidenceApplied,
    /// An event would have emptied the candidate set and was discarded
    InconsistentEvidence,
    /// Exactly one candidate remains
    Determined,
    /// Events ran out with several candidates remaining
    Exhausted,
    /// No event carried evidence
    Undetermined,
    /// Checkpoint decision tree disagrees with the candidate engine
    CheckpointDivergence,

    // Records
    /// Determination record or settings file written
    RecordWritten,
    /// Record already present, left untouched
    RecordSkipped,

    // Batch
    /// One project of a batch failed; the batch continues
    ProjectFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::ReferenceLoaded => "REFERENCE_LOADED",
            Event::ReferenceLineSkipped => "REFERENCE_LINE_SKIPPED",
            Event::ReferenceRejected => "REFERENCE_REJECTED",

            Event::TableBuilt => "DIVERGENCE_TABLE_BUILT",
            Event::TableLoaded => "DIVERGENCE_TABLE_LOADED",
            Event::TableWritten => "DIVERGENCE_TABLE_WRITTEN",

            Event::ScanStart => "SCAN_BEGIN",
            Event::DuplicateBookSource => "DUPLICATE_BOOK_SOURCE",
            Event::BookSourceUnreadable => "BOOK_SOURCE_UNREADABLE",
            Event::BookSourceReadFailed => "BOOK_SOURCE_READ_FAILED",

            Event::EvidenceApplied => "EVIDENCE_APPLIED",
            Event::InconsistentEvidence => "INCONSISTENT_EVIDENCE",
            Event::Determined => "VERSIFICATION_DETERMINED",
            Event::Exhausted => "VERSIFICATION_EXHAUSTED",
            Event::Undetermined => "VERSIFICATION_UNDETERMINED",
            Event::CheckpointDivergence => "VERSIFICATION_CHECKPOINT_DIVERGENCE",

            Event::RecordWritten => "RECORD_WRITTEN",
            Event::RecordSkipped => "RECORD_SKIPPED",

            Event::ProjectFailed => "PROJECT_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ReferenceRejected)
    }

    /// Returns true if this event reports a failed operation
    pub fn is_error(&self) -> bool {
        matches!(self, Event::ProjectFailed)
    }

    /// Events that only matter when following a single run step by step
    pub fn is_trace(&self) -> bool {
        matches!(self, Event::EvidenceApplied | Event::ReferenceLineSkipped)
    }

    /// Events that signal something a curator should look at
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::InconsistentEvidence
                | Event::CheckpointDivergence
                | Event::DuplicateBookSource
                | Event::BookSourceUnreadable
                | Event::BookSourceReadFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
