//! Verse reference scanner
//!
//! Turns the raw USFM lines of a translation into an ordered sequence of
//! chapter boundary events: (book, chapter, last verse) for each completed
//! chapter, in document order.
//!
//! The scanner only recognises `\c` and `\v` markers; it is not a USFM
//! parser. A book missing from the project simply produces no events.

mod boundary;
mod errors;
mod project;

pub use boundary::{BoundaryEvent, BoundaryScanner};
pub use errors::{ScanError, ScanResult};
pub use project::{book_code_from_file_name, BookLines, ProjectSource};
