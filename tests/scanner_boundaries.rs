//! Scanner Boundary Tests
//!
//! Tests for chapter boundary extraction from a project folder:
//! - Books are read in canonical order, whatever the file names
//! - One event per completed chapter, carrying its highest verse
//! - Unrecognised and duplicate files are ignored
//! - A missing project is an error; a missing book is not

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use versifier::canon::BookId;
use versifier::reference::DivergenceTable;
use versifier::scanner::{BoundaryEvent, BoundaryScanner, ProjectSource};

// =============================================================================
// Helper Functions
// =============================================================================

fn write(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

fn ev(code: &str, chapter: u32, last_verse: u32) -> BoundaryEvent {
    BoundaryEvent::new(BookId::parse(code).unwrap(), chapter, last_verse)
}

fn scan_all(project: &ProjectSource) -> Vec<BoundaryEvent> {
    BoundaryScanner::unfiltered(project.books()).collect()
}

// =============================================================================
// Ordering Tests
// =============================================================================

/// Events follow canonical book order, not file name order.
#[test]
fn test_books_scanned_in_canonical_order() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "70-MATaai.usfm", "\\id MAT\n\\c 1\n\\v 1 a\n\\v 25 b\n");
    write(tmp.path(), "01-GENaai.usfm", "\\id GEN\n\\c 1\n\\v 1 a\n\\v 31 b\n\\c 2\n\\v 25 c\n");
    write(tmp.path(), "RUTaai.usfm", "\\id RUT\n\\c 1 \\v 1-22 all\n");

    let project = ProjectSource::open(tmp.path()).unwrap();
    let codes: Vec<&str> = project.book_ids().map(|b| b.code()).collect();
    assert_eq!(codes, vec!["GEN", "RUT", "MAT"]);

    assert_eq!(
        scan_all(&project),
        vec![ev("GEN", 1, 31), ev("GEN", 2, 25), ev("RUT", 1, 22), ev("MAT", 1, 25)]
    );
}

/// Scanning the same project twice gives the same events.
#[test]
fn test_scan_is_repeatable() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "DAN.usfm", "\\c 1\n\\v 21\n\\c 2\n\\v 49\n\\c 3\n\\v 33\n");

    let project = ProjectSource::open(tmp.path()).unwrap();
    assert_eq!(scan_all(&project), scan_all(&project));
}

// =============================================================================
// Chapter Content Tests
// =============================================================================

/// Markers inside paragraphs and verse ranges are recognised.
#[test]
fn test_inline_markers_and_ranges() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "JHN.usfm",
        "\\id JHN\n\\c 6\n\\p\n\\v 1 text \\v 2 text\n\\q1 \\v 70-71 text\n\\c 7\n\\s heading\n",
    );

    let project = ProjectSource::open(tmp.path()).unwrap();
    assert_eq!(scan_all(&project), vec![ev("JHN", 6, 71), ev("JHN", 7, 0)]);
}

/// Invalid UTF-8 does not stop the scan.
#[test]
fn test_invalid_utf8_decoded_lossily() {
    let tmp = TempDir::new().unwrap();
    let mut bytes = b"\\c 1\n\\v 1 caf".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    bytes.extend_from_slice(b"\n\\v 16 end\n");
    fs::write(tmp.path().join("ROM.usfm"), bytes).unwrap();

    let project = ProjectSource::open(tmp.path()).unwrap();
    assert_eq!(scan_all(&project), vec![ev("ROM", 1, 16)]);
}

// =============================================================================
// Project Listing Tests
// =============================================================================

/// Non-USFM files and files without a book code are ignored.
#[test]
fn test_unrecognised_files_ignored() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ACT.usfm", "\\c 19\n\\v 41\n");
    write(tmp.path(), "ACT.txt", "\\c 19\n\\v 40\n");
    write(tmp.path(), "FRTaai.usfm", "\\c 1\n\\v 9\n");
    write(tmp.path(), "notes.usfm", "\\c 1\n\\v 9\n");
    fs::create_dir(tmp.path().join("GEN.usfm")).unwrap();

    let project = ProjectSource::open(tmp.path()).unwrap();
    assert_eq!(scan_all(&project), vec![ev("ACT", 19, 41)]);
}

/// When two files claim the same book, the lexically first one is read.
#[test]
fn test_duplicate_book_keeps_first_file() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "44-ACTaai.usfm", "\\c 19\n\\v 40\n");
    write(tmp.path(), "ACTaai.usfm", "\\c 19\n\\v 41\n");

    let project = ProjectSource::open(tmp.path()).unwrap();
    assert_eq!(scan_all(&project), vec![ev("ACT", 19, 40)]);
}

/// An empty project yields no events.
#[test]
fn test_empty_project_yields_nothing() {
    let tmp = TempDir::new().unwrap();
    let project = ProjectSource::open(tmp.path()).unwrap();
    assert!(scan_all(&project).is_empty());
    assert!(!project.has_old_testament());
}

/// A book file that fails to read fails the scan instead of ending the
/// book early; later books are not read.
#[test]
fn test_read_failure_fails_scan() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "27-DANorg.usfm", "\\c 3\n\\v 30\n\\v 33\n");
    write(tmp.path(), "45-ROMorg.usfm", "\\c 16\n\\v 27\n");
    let project = ProjectSource::open(tmp.path()).unwrap();

    // Listed as a file, but a directory by the time it is read.
    let dan = tmp.path().join("27-DANorg.usfm");
    fs::remove_file(&dan).unwrap();
    fs::create_dir(&dan).unwrap();

    assert!(scan_all(&project).is_empty());
    let err = project.finish_reads().unwrap_err();
    assert_eq!(err.code(), "VRS_BOOK_READ_FAILED");

    // The failure is reported once.
    assert!(project.finish_reads().is_ok());
}

/// A clean scan reports no read failure.
#[test]
fn test_clean_scan_finishes_ok() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "ROM.usfm", "\\c 16\n\\v 27\n");
    let project = ProjectSource::open(tmp.path()).unwrap();

    assert_eq!(scan_all(&project), vec![ev("ROM", 16, 27)]);
    assert!(project.finish_reads().is_ok());
}

/// A missing project directory is an error.
#[test]
fn test_missing_project_is_error() {
    let tmp = TempDir::new().unwrap();
    let err = ProjectSource::open(&tmp.path().join("absent")).unwrap_err();
    assert_eq!(err.code(), "VRS_PROJECT_NOT_FOUND");

    let file = tmp.path().join("MAT.usfm");
    write(tmp.path(), "MAT.usfm", "\\c 1\n");
    let err = ProjectSource::open(&file).unwrap_err();
    assert_eq!(err.code(), "VRS_PROJECT_NOT_A_DIRECTORY");
}

// =============================================================================
// Filtering Tests
// =============================================================================

/// With a table, books it does not cover produce no events.
#[test]
fn test_filtered_scan_covers_table_books_only() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "GEN.usfm", "\\c 1\n\\v 31\n");
    write(tmp.path(), "DAN.usfm", "\\c 3\n\\v 33\n");
    write(tmp.path(), "MAT.usfm", "\\c 1\n\\v 25\n");
    write(tmp.path(), "ROM.usfm", "\\c 16\n\\v 27\n");

    let table = DivergenceTable::shipped().unwrap();
    let project = ProjectSource::open(tmp.path()).unwrap();
    let events: Vec<BoundaryEvent> = BoundaryScanner::new(project.books(), &table).collect();

    assert_eq!(events, vec![ev("DAN", 3, 33), ev("ROM", 16, 27)]);
}

/// Restricting the books never opens the others.
#[test]
fn test_books_where_restricts_books() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "GEN.usfm", "\\c 1\n\\v 31\n");
    write(tmp.path(), "DAN.usfm", "\\c 5\n\\v 31\n");

    let project = ProjectSource::open(tmp.path()).unwrap();
    let events: Vec<BoundaryEvent> =
        BoundaryScanner::unfiltered(project.books_where(|b| b.code() == "DAN")).collect();

    assert_eq!(events, vec![ev("DAN", 5, 31)]);
}
