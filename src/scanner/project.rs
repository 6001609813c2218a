//! Translation project source
//!
//! A project is a folder of USFM files, one per book. File names vary
//! between archives (`46-MATaai.usfm`, `MAT.usfm`, `01-GEN.usfm`,
//! `GENeng-web.usfm`); the book code is the first three upper-case
//! characters after an optional numeric prefix.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;

use crate::canon::BookId;
use crate::observability::{log_event_with_fields, Event};

use super::errors::{ScanError, ScanResult};

static FILE_NAME: OnceLock<Regex> = OnceLock::new();

fn file_name_pattern() -> &'static Regex {
    FILE_NAME.get_or_init(|| Regex::new(r"^(?:\d+-)?([0-9A-Z]{3})").expect("file name pattern is valid"))
}

/// Derives the book code from a USFM file name.
pub fn book_code_from_file_name(file_name: &str) -> Option<BookId> {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let caps = file_name_pattern().captures(stem)?;
    BookId::parse(caps.get(1)?.as_str())
}

fn is_usfm(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("usfm"))
}

/// First I/O failure of a scan, shared by a project's line readers.
type ReadFailure = Rc<RefCell<Option<ScanError>>>;

/// The USFM books of one project, in canonical order.
///
/// Book files are read lazily. A file that cannot be read is recorded here
/// and ends the scan; callers check [`finish_reads`](Self::finish_reads)
/// before trusting anything derived from the lines.
#[derive(Debug, Clone)]
pub struct ProjectSource {
    dir: PathBuf,
    books: BTreeMap<BookId, PathBuf>,
    failure: ReadFailure,
}

impl ProjectSource {
    /// Lists the project's USFM files.
    ///
    /// When two files map to the same book, the lexically first one is kept.
    pub fn open(dir: &Path) -> ScanResult<Self> {
        if !dir.exists() {
            return Err(ScanError::ProjectNotFound(dir.to_path_buf()));
        }
        if !dir.is_dir() {
            return Err(ScanError::NotADirectory(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| ScanError::ListFailed {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ScanError::ListFailed {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && is_usfm(&path) {
                files.push(path);
            }
        }
        files.sort();

        let mut books: BTreeMap<BookId, PathBuf> = BTreeMap::new();
        for path in files {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let Some(book) = book_code_from_file_name(&name) else {
                continue;
            };
            if let Some(kept) = books.get(&book) {
                log_event_with_fields(
                    Event::DuplicateBookSource,
                    &[
                        ("book", book.code()),
                        ("kept", &kept.display().to_string()),
                        ("ignored", &path.display().to_string()),
                    ],
                );
                continue;
            }
            books.insert(book, path);
        }

        Ok(Self {
            dir: dir.to_path_buf(),
            books,
            failure: ReadFailure::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Books present, in canonical order
    pub fn book_ids(&self) -> impl Iterator<Item = BookId> + '_ {
        self.books.keys().copied()
    }

    pub fn has_old_testament(&self) -> bool {
        self.books.keys().any(|b| b.is_old_testament())
    }

    /// Each book with a lazy line reader.
    ///
    /// A file is opened only when its book is reached. After a read
    /// failure every reader yields nothing.
    pub fn books(&self) -> impl Iterator<Item = (BookId, BookLines)> + '_ {
        self.books
            .iter()
            .map(|(book, path)| (*book, BookLines::open(path, &self.failure)))
    }

    /// Like [`books`](Self::books), restricted to books accepted by `keep`.
    /// Files of other books are never opened.
    pub fn books_where<'a, F>(&'a self, keep: F) -> impl Iterator<Item = (BookId, BookLines)> + 'a
    where
        F: Fn(BookId) -> bool + 'a,
    {
        self.books
            .iter()
            .filter(move |(book, _)| keep(**book))
            .map(|(book, path)| (*book, BookLines::open(path, &self.failure)))
    }

    /// Fails with the first read error of the scans so far, clearing it.
    pub fn finish_reads(&self) -> ScanResult<()> {
        match self.failure.borrow_mut().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Lines of one USFM file, decoded lossily.
///
/// Reading stops at the first I/O error, which is recorded for the project.
pub struct BookLines {
    reader: Option<BufReader<File>>,
    path: PathBuf,
    buf: Vec<u8>,
    failure: ReadFailure,
}

impl BookLines {
    fn open(path: &Path, failure: &ReadFailure) -> Self {
        let mut lines = Self {
            reader: None,
            path: path.to_path_buf(),
            buf: Vec::new(),
            failure: Rc::clone(failure),
        };
        if lines.failure.borrow().is_some() {
            return lines;
        }
        match File::open(path) {
            Ok(file) => lines.reader = Some(BufReader::new(file)),
            Err(e) => lines.fail(Event::BookSourceUnreadable, e),
        }
        lines
    }

    fn fail(&mut self, event: Event, source: io::Error) {
        log_event_with_fields(
            event,
            &[
                ("path", self.path.display().to_string().as_str()),
                ("reason", source.to_string().as_str()),
            ],
        );
        self.reader = None;
        let mut slot = self.failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(ScanError::ReadFailed {
                path: self.path.clone(),
                source,
            });
        }
    }
}

impl Iterator for BookLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let reader = self.reader.as_mut()?;
        self.buf.clear();
        match reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => Some(String::from_utf8_lossy(&self.buf).into_owned()),
            Err(e) => {
                self.fail(Event::BookSourceReadFailed, e);
                None
            }
        }
    }
}
