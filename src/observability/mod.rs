//! Observability for versifier
//!
//! Structured JSON logging of lifecycle and inference events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on inference
//! 3. No background threads or global mutable state
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use versifier::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::Determined, &[("scheme", "English")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity, LOG_LEVEL_ENV};

/// Severity an event is logged at when no explicit level is given.
pub fn severity_of(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_error() {
        Severity::Error
    } else if event.is_warning() {
        Severity::Warn
    } else if event.is_trace() {
        Severity::Trace
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    Logger::log(severity_of(event), event.as_str(), &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_of(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_of_events() {
        assert_eq!(severity_of(Event::ReferenceRejected), Severity::Fatal);
        assert_eq!(severity_of(Event::ProjectFailed), Severity::Error);
        assert_eq!(severity_of(Event::InconsistentEvidence), Severity::Warn);
        assert_eq!(severity_of(Event::BookSourceReadFailed), Severity::Warn);
        assert_eq!(severity_of(Event::EvidenceApplied), Severity::Trace);
        assert_eq!(severity_of(Event::Determined), Severity::Info);
    }

    #[test]
    fn test_log_event() {
        log_event(Event::ScanStart);
        log_event_with_fields(Event::TableBuilt, &[("books", "5")]);
    }
}
