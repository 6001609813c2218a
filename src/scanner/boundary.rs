//! Chapter boundary scanner
//!
//! Walks the lines of each book and emits one [`BoundaryEvent`] per
//! completed chapter, carrying the highest verse number seen in it.
//!
//! Markers are recognised by prefix pattern only:
//! - `\c N` opens chapter N
//! - `\v N` or `\v N-M` is a verse (a range counts as M)
//!
//! A chapter is complete when the next chapter marker arrives or the book
//! ends. Verses before the first chapter marker belong to no chapter.

use std::collections::VecDeque;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::canon::BookId;
use crate::reference::DivergenceTable;

static MARKER: OnceLock<Regex> = OnceLock::new();

fn marker_pattern() -> &'static Regex {
    MARKER.get_or_init(|| {
        Regex::new(r"\\([cv])\s*(\d+)(?:\s*-\s*(\d+))?").expect("marker pattern is valid")
    })
}

/// A completed chapter observed in a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryEvent {
    pub book: BookId,
    pub chapter: u32,
    /// Highest verse number seen in the chapter; 0 when it had none
    pub last_verse: u32,
}

impl BoundaryEvent {
    pub fn new(book: BookId, chapter: u32, last_verse: u32) -> Self {
        Self {
            book,
            chapter,
            last_verse,
        }
    }
}

impl fmt::Display for BoundaryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.last_verse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Chapter(u32),
    Verse(u32),
}

/// Markers on one line, in line order. Numbers that overflow are ignored.
fn markers(line: &str) -> impl Iterator<Item = Marker> + '_ {
    marker_pattern().captures_iter(line).filter_map(|caps| {
        let start: u32 = caps.get(2)?.as_str().parse().ok()?;
        match &caps[1] {
            "c" => Some(Marker::Chapter(start)),
            _ => {
                let end = caps
                    .get(3)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .unwrap_or(start);
                Some(Marker::Verse(end.max(start)))
            }
        }
    })
}

/// Scan state for the book currently being read.
struct BookCursor<I> {
    book: BookId,
    lines: I,
    /// (chapter, highest verse so far)
    open: Option<(u32, u32)>,
    finished: bool,
}

impl<I, S> BookCursor<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    /// Reads lines until at least one event is queued or the book ends.
    fn advance(&mut self, pending: &mut VecDeque<BoundaryEvent>) {
        while pending.is_empty() && !self.finished {
            match self.lines.next() {
                Some(line) => {
                    for marker in markers(line.as_ref()) {
                        match marker {
                            Marker::Chapter(n) => match self.open {
                                Some((current, _)) if current == n => {}
                                Some((current, last)) => {
                                    pending.push_back(BoundaryEvent::new(self.book, current, last));
                                    self.open = Some((n, 0));
                                }
                                None => self.open = Some((n, 0)),
                            },
                            Marker::Verse(v) => {
                                if let Some((_, last)) = self.open.as_mut() {
                                    *last = (*last).max(v);
                                }
                            }
                        }
                    }
                }
                None => {
                    if let Some((current, last)) = self.open.take() {
                        pending.push_back(BoundaryEvent::new(self.book, current, last));
                    }
                    self.finished = true;
                }
            }
        }
    }
}

/// Lazy, finite, non-restartable sequence of boundary events.
///
/// `books` yields each book once with its ordered lines. When a filter table
/// is set, books it does not contain are skipped without reading a line.
pub struct BoundaryScanner<'t, B, L>
where
    B: Iterator<Item = (BookId, L)>,
    L: IntoIterator,
{
    books: B,
    filter: Option<&'t DivergenceTable>,
    cursor: Option<BookCursor<L::IntoIter>>,
    pending: VecDeque<BoundaryEvent>,
}

impl<'t, B, L> BoundaryScanner<'t, B, L>
where
    B: Iterator<Item = (BookId, L)>,
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    /// Scans only the books present in `table`.
    pub fn new<T>(books: T, table: &'t DivergenceTable) -> Self
    where
        T: IntoIterator<IntoIter = B>,
    {
        Self {
            books: books.into_iter(),
            filter: Some(table),
            cursor: None,
            pending: VecDeque::new(),
        }
    }

    /// Scans every book.
    pub fn unfiltered<T>(books: T) -> Self
    where
        T: IntoIterator<IntoIter = B>,
    {
        Self {
            books: books.into_iter(),
            filter: None,
            cursor: None,
            pending: VecDeque::new(),
        }
    }

    fn wanted(&self, book: BookId) -> bool {
        self.filter.map_or(true, |t| t.contains_book(book))
    }
}

impl<'t, B, L> Iterator for BoundaryScanner<'t, B, L>
where
    B: Iterator<Item = (BookId, L)>,
    L: IntoIterator,
    L::Item: AsRef<str>,
{
    type Item = BoundaryEvent;

    fn next(&mut self) -> Option<BoundaryEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            if let Some(cursor) = self.cursor.as_mut().filter(|c| !c.finished) {
                cursor.advance(&mut self.pending);
                continue;
            }

            let (book, lines) = self.books.next()?;
            if self.wanted(book) {
                self.cursor = Some(BookCursor {
                    book,
                    lines: lines.into_iter(),
                    open: None,
                    finished: false,
                });
            }
        }
    }
}
