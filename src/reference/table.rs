//! Divergence table types
//!
//! The table records, per diagnostic book, every point where the reference
//! schemes disagree and which schemes predict which observed value there.
//! It is built once and read-only afterwards; share it by reference.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::canon::{BookId, SchemeSet, VersificationScheme};

/// A point of possible disagreement between schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DivergenceKey {
    /// Schemes disagree on the last verse of `chapter`
    ChapterLastVerse { book: BookId, chapter: u32 },
    /// Schemes disagree on how many chapters `book` has
    BookLastChapter { book: BookId },
}

impl DivergenceKey {
    pub fn book(&self) -> BookId {
        match self {
            DivergenceKey::ChapterLastVerse { book, .. } => *book,
            DivergenceKey::BookLastChapter { book } => *book,
        }
    }
}

impl fmt::Display for DivergenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DivergenceKey::ChapterLastVerse { book, chapter } => {
                write!(f, "{} {} last verse", book, chapter)
            }
            DivergenceKey::BookLastChapter { book } => write!(f, "{} chapter count", book),
        }
    }
}

/// Observed value -> schemes predicting exactly that value.
///
/// Buckets are pairwise disjoint. A scheme in no bucket has no prediction
/// at this key (its book ends before the chapter in question).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evidence {
    buckets: BTreeMap<u32, SchemeSet>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `scheme` predicts `value`.
    pub fn add(&mut self, value: u32, scheme: VersificationScheme) {
        self.buckets.entry(value).or_default().insert(scheme);
    }

    /// Builds evidence from explicit buckets. Empty buckets are dropped.
    pub fn from_buckets<I>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (u32, SchemeSet)>,
    {
        let mut evidence = Self::new();
        for (value, schemes) in buckets {
            if schemes.is_empty() {
                continue;
            }
            let slot = evidence.buckets.entry(value).or_default();
            *slot = slot.union(schemes);
        }
        evidence
    }

    /// Schemes predicting exactly `value`
    pub fn matched(&self, value: u32) -> SchemeSet {
        self.buckets.get(&value).copied().unwrap_or_default()
    }

    /// Schemes falsified by observing `value`.
    ///
    /// Empty when `value` is in no bucket: an unknown value falsifies nothing.
    pub fn conflicting(&self, value: u32) -> SchemeSet {
        if !self.buckets.contains_key(&value) {
            return SchemeSet::empty();
        }
        self.buckets
            .iter()
            .filter(|(v, _)| **v != value)
            .fold(SchemeSet::empty(), |acc, (_, s)| acc.union(*s))
    }

    /// Union of all buckets
    pub fn predicting(&self) -> SchemeSet {
        self.buckets
            .values()
            .fold(SchemeSet::empty(), |acc, s| acc.union(*s))
    }

    /// True when `value` is a bucket key
    pub fn has_value(&self, value: u32) -> bool {
        self.buckets.contains_key(&value)
    }

    pub fn distinct_values(&self) -> usize {
        self.buckets.len()
    }

    /// True when no scheme appears in two buckets
    pub fn is_partition(&self) -> bool {
        let mut seen = SchemeSet::empty();
        for schemes in self.buckets.values() {
            if !seen.is_disjoint(schemes) {
                return false;
            }
            seen = seen.union(*schemes);
        }
        true
    }

    /// Buckets in ascending value order
    pub fn buckets(&self) -> impl Iterator<Item = (u32, SchemeSet)> + '_ {
        self.buckets.iter().map(|(v, s)| (*v, *s))
    }
}

/// All divergence points for one book.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDivergence {
    /// chapter -> last-verse evidence
    pub chapters: BTreeMap<u32, Evidence>,
    /// chapter-count evidence
    pub book_length: Option<Evidence>,
}

impl BookDivergence {
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty() && self.book_length.is_none()
    }

    pub fn len(&self) -> usize {
        self.chapters.len() + usize::from(self.book_length.is_some())
    }
}

/// Immutable map of every diagnostic disagreement point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DivergenceTable {
    books: BTreeMap<BookId, BookDivergence>,
}

impl DivergenceTable {
    /// Assembles a table, dropping books without entries.
    pub(crate) fn from_books(books: BTreeMap<BookId, BookDivergence>) -> Self {
        Self {
            books: books.into_iter().filter(|(_, d)| !d.is_empty()).collect(),
        }
    }

    /// Evidence stored at `key`, if the schemes disagree there
    pub fn evidence(&self, key: &DivergenceKey) -> Option<&Evidence> {
        match key {
            DivergenceKey::ChapterLastVerse { book, chapter } => {
                self.books.get(book)?.chapters.get(chapter)
            }
            DivergenceKey::BookLastChapter { book } => self.books.get(book)?.book_length.as_ref(),
        }
    }

    /// True when `book` is diagnostic
    pub fn contains_book(&self, book: BookId) -> bool {
        self.books.contains_key(&book)
    }

    pub fn book(&self, book: BookId) -> Option<&BookDivergence> {
        self.books.get(&book)
    }

    /// Diagnostic books in canonical order
    pub fn books(&self) -> impl Iterator<Item = BookId> + '_ {
        self.books.keys().copied()
    }

    /// Every key with its evidence, in canonical book order, chapters
    /// before the book-length key.
    pub fn entries(&self) -> impl Iterator<Item = (DivergenceKey, &Evidence)> + '_ {
        self.books.iter().flat_map(|(book, div)| {
            let book = *book;
            div.chapters
                .iter()
                .map(move |(chapter, ev)| {
                    (
                        DivergenceKey::ChapterLastVerse {
                            book,
                            chapter: *chapter,
                        },
                        ev,
                    )
                })
                .chain(
                    div.book_length
                        .iter()
                        .map(move |ev| (DivergenceKey::BookLastChapter { book }, ev)),
                )
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = DivergenceKey> + '_ {
        self.entries().map(|(k, _)| k)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.books.values().map(BookDivergence::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::VersificationScheme::*;

    fn rom16() -> Evidence {
        Evidence::from_buckets([
            (24, SchemeSet::of(&[RussianProtestant, RussianOrthodox])),
            (27, SchemeSet::of(&[English, Original, Septuagint, Vulgate])),
        ])
    }

    #[test]
    fn test_matched_and_conflicting() {
        let ev = rom16();
        assert_eq!(ev.matched(24), SchemeSet::of(&[RussianProtestant, RussianOrthodox]));
        assert_eq!(
            ev.conflicting(24),
            SchemeSet::of(&[English, Original, Septuagint, Vulgate])
        );
        assert_eq!(ev.predicting(), SchemeSet::all());
        assert!(ev.is_partition());
    }

    #[test]
    fn test_unknown_value_falsifies_nothing() {
        let ev = rom16();
        assert!(ev.matched(25).is_empty());
        assert!(ev.conflicting(25).is_empty());
        assert!(!ev.has_value(25));
    }

    #[test]
    fn test_overlapping_buckets_are_not_a_partition() {
        let ev = Evidence::from_buckets([
            (1, SchemeSet::of(&[English, Vulgate])),
            (2, SchemeSet::of(&[Vulgate])),
        ]);
        assert!(!ev.is_partition());
    }

    #[test]
    fn test_table_lookup_and_entries() {
        let rom = BookId::parse("ROM").unwrap();
        let dan = BookId::parse("DAN").unwrap();

        let mut books = BTreeMap::new();
        let mut rom_div = BookDivergence::default();
        rom_div.chapters.insert(16, rom16());
        books.insert(rom, rom_div);
        books.insert(dan, BookDivergence::default());

        let table = DivergenceTable::from_books(books);
        assert!(table.contains_book(rom));
        assert!(!table.contains_book(dan));
        assert_eq!(table.len(), 1);

        let key = DivergenceKey::ChapterLastVerse { book: rom, chapter: 16 };
        assert_eq!(table.evidence(&key), Some(&rom16()));
        assert!(table
            .evidence(&DivergenceKey::BookLastChapter { book: rom })
            .is_none());
        assert_eq!(table.keys().collect::<Vec<_>>(), vec![key]);
    }
}
