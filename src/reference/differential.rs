//! Reference differential builder
//!
//! Aligns the six schemes book by book and keeps only the points where
//! they disagree:
//!
//! 1. For each chapter index defined by at least one scheme, bucket the
//!    schemes that define it by last verse. Keep the key if there are two or
//!    more distinct values.
//! 2. Bucket every scheme by chapter count. Keep the key if there are two
//!    or more distinct counts.
//!
//! Output depends only on the six layouts; rebuilding is always wholesale.

use std::collections::BTreeMap;

use crate::canon::BookId;
use crate::observability::{log_event_with_fields, Event};

use super::parser::ReferenceSet;
use super::table::{BookDivergence, DivergenceTable, Evidence};

/// Builds a [`DivergenceTable`] from a [`ReferenceSet`].
pub struct DivergenceBuilder<'a> {
    references: &'a ReferenceSet,
}

impl<'a> DivergenceBuilder<'a> {
    pub fn new(references: &'a ReferenceSet) -> Self {
        Self { references }
    }

    /// Builds the table over the 66 protocanonical books, in canonical order.
    pub fn build(&self) -> DivergenceTable {
        let mut books = BTreeMap::new();

        for book in BookId::protocanonical() {
            let divergence = self.book_divergence(book);
            if !divergence.is_empty() {
                books.insert(book, divergence);
            }
        }

        let table = DivergenceTable::from_books(books);
        log_event_with_fields(
            Event::TableBuilt,
            &[
                ("books", &table.books().count().to_string()),
                ("keys", &table.len().to_string()),
            ],
        );
        table
    }

    fn book_divergence(&self, book: BookId) -> BookDivergence {
        let mut divergence = BookDivergence::default();
        let mut book_length = Evidence::new();
        let mut longest = 0;

        for layout in self.references.layouts() {
            // Loading guarantees every protocanonical book is present.
            let chapters = layout.chapters(book).unwrap_or(&[]);
            book_length.add(chapters.len() as u32, layout.scheme);
            longest = longest.max(chapters.len());
        }

        for index in 0..longest {
            let mut last_verse = Evidence::new();
            for layout in self.references.layouts() {
                if let Some(verse) = layout.chapters(book).and_then(|c| c.get(index)) {
                    last_verse.add(*verse, layout.scheme);
                }
            }
            if last_verse.distinct_values() >= 2 {
                divergence.chapters.insert(index as u32 + 1, last_verse);
            }
        }

        if book_length.distinct_values() >= 2 {
            divergence.book_length = Some(book_length);
        }

        divergence
    }
}

/// Convenience wrapper around [`DivergenceBuilder`].
pub fn build_table(references: &ReferenceSet) -> DivergenceTable {
    DivergenceBuilder::new(references).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::{SchemeSet, VersificationScheme, VersificationScheme::*};
    use crate::reference::DivergenceKey;

    /// Uniform layout for every book, with per-scheme overrides.
    fn references(overrides: &[(VersificationScheme, &str, &str)]) -> ReferenceSet {
        let texts: Vec<(VersificationScheme, String)> = VersificationScheme::ALL
            .iter()
            .map(|scheme| {
                let text: String = BookId::protocanonical()
                    .map(|b| {
                        let line = overrides
                            .iter()
                            .find(|(s, code, _)| s == scheme && *code == b.code())
                            .map(|(_, _, l)| l.to_string())
                            .unwrap_or_else(|| "1:10 2:12".to_string());
                        format!("{} {}\n", b.code(), line)
                    })
                    .collect();
                (*scheme, text)
            })
            .collect();
        ReferenceSet::from_sources(texts.iter().map(|(s, t)| (*s, t.as_str()))).unwrap()
    }

    #[test]
    fn test_identical_references_give_empty_table() {
        let table = build_table(&references(&[]));
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_last_verse_divergence() {
        let table = build_table(&references(&[
            (English, "ACT", "1:10 2:13"),
            (Vulgate, "ACT", "1:10 2:14"),
        ]));
        let act = BookId::parse("ACT").unwrap();

        assert_eq!(table.books().collect::<Vec<_>>(), vec![act]);
        assert!(table
            .evidence(&DivergenceKey::ChapterLastVerse { book: act, chapter: 1 })
            .is_none());

        let ev = table
            .evidence(&DivergenceKey::ChapterLastVerse { book: act, chapter: 2 })
            .unwrap();
        assert_eq!(ev.matched(13), SchemeSet::single(English));
        assert_eq!(ev.matched(14), SchemeSet::single(Vulgate));
        assert_eq!(ev.matched(12).len(), 4);
        assert_eq!(ev.predicting(), SchemeSet::all());
    }

    #[test]
    fn test_book_length_divergence() {
        let table = build_table(&references(&[
            (Vulgate, "DAN", "1:10 2:12 3:64"),
            (RussianOrthodox, "DAN", "1:10 2:12 3:64"),
        ]));
        let dan = BookId::parse("DAN").unwrap();

        let length = table
            .evidence(&DivergenceKey::BookLastChapter { book: dan })
            .unwrap();
        assert_eq!(length.matched(3), SchemeSet::of(&[Vulgate, RussianOrthodox]));
        assert_eq!(length.matched(2).len(), 4);

        // Both long schemes agree on chapter 3, so only the count diverges.
        assert!(table
            .evidence(&DivergenceKey::ChapterLastVerse { book: dan, chapter: 3 })
            .is_none());
    }

    #[test]
    fn test_extra_chapter_disagreement_only_among_defining_schemes() {
        let table = build_table(&references(&[
            (Vulgate, "DAN", "1:10 2:12 3:65"),
            (RussianOrthodox, "DAN", "1:10 2:12 3:64"),
        ]));
        let dan = BookId::parse("DAN").unwrap();

        let ev = table
            .evidence(&DivergenceKey::ChapterLastVerse { book: dan, chapter: 3 })
            .unwrap();
        assert_eq!(ev.predicting(), SchemeSet::of(&[Vulgate, RussianOrthodox]));
        assert!(ev.is_partition());
    }

    #[test]
    fn test_build_is_deterministic() {
        let refs = references(&[
            (English, "JHN", "1:10 2:13"),
            (Original, "ROM", "1:11 2:12"),
        ]);
        let first = build_table(&refs);
        for _ in 0..10 {
            assert_eq!(build_table(&refs), first);
        }
    }
}
