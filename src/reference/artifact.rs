//! Divergence table artifact
//!
//! A persisted divergence table, so the six reference files need not be
//! parsed on every run.
//!
//! Format:
//! ```json
//! {
//!   "format_version": 1,
//!   "reference_checksums": { "eng.vrs": "crc32:1a2b3c4d" },
//!   "books": {
//!     "ROM": [
//!       { "key": { "kind": "chapter_last_verse", "chapter": 16 },
//!         "buckets": { "24": ["RussianProtestant", "RussianOrthodox"],
//!                      "27": ["Original", "Septuagint", "Vulgate", "English"] } }
//!     ]
//!   }
//! }
//! ```
//!
//! Loading an artifact and rebuilding from the references yield equal tables.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::canon::{BookId, SchemeSet};

use super::errors::{ReferenceError, ReferenceResult};
use super::parser::ReferenceSet;
use super::table::{BookDivergence, DivergenceTable, Evidence};

/// Current artifact format version
pub const FORMAT_VERSION: u8 = 1;

/// Divergence table shipped with the binary
const SHIPPED_TABLE: &str = include_str!("../../data/divergence_table.json");

/// Key of one artifact entry; the book is the enclosing map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKey {
    ChapterLastVerse { chapter: u32 },
    BookLastChapter,
}

/// One divergence point with its buckets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEntry {
    pub key: EntryKey,
    pub buckets: BTreeMap<u32, SchemeSet>,
}

/// Serialized divergence table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableArtifact {
    pub format_version: u8,

    /// Checksums of the reference files the table was built from.
    /// Empty for hand-curated tables.
    #[serde(default)]
    pub reference_checksums: BTreeMap<String, String>,

    pub books: BTreeMap<BookId, Vec<ArtifactEntry>>,
}

impl TableArtifact {
    /// Captures `table`, stamping it with the checksums of its references.
    pub fn from_table(table: &DivergenceTable, references: Option<&ReferenceSet>) -> Self {
        let mut books = BTreeMap::new();

        for book in table.books() {
            let Some(div) = table.book(book) else {
                continue;
            };
            let mut entries: Vec<ArtifactEntry> = div
                .chapters
                .iter()
                .map(|(chapter, ev)| ArtifactEntry {
                    key: EntryKey::ChapterLastVerse { chapter: *chapter },
                    buckets: ev.buckets().collect(),
                })
                .collect();
            if let Some(ev) = &div.book_length {
                entries.push(ArtifactEntry {
                    key: EntryKey::BookLastChapter,
                    buckets: ev.buckets().collect(),
                });
            }
            books.insert(book, entries);
        }

        Self {
            format_version: FORMAT_VERSION,
            reference_checksums: references
                .map(|r| r.checksums().clone())
                .unwrap_or_default(),
            books,
        }
    }

    /// Converts into a table, validating every entry.
    ///
    /// Each key needs at least two non-empty buckets, and the buckets must
    /// be pairwise disjoint. Duplicate keys within a book are rejected.
    pub fn into_table(self) -> ReferenceResult<DivergenceTable> {
        if self.format_version != FORMAT_VERSION {
            return Err(ReferenceError::table_malformed(format!(
                "Unsupported format_version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }

        let mut books = BTreeMap::new();

        for (book, entries) in self.books {
            let mut div = BookDivergence::default();

            for entry in entries {
                if entry.buckets.values().any(SchemeSet::is_empty) {
                    return Err(ReferenceError::table_malformed(format!(
                        "{} {:?}: empty bucket",
                        book, entry.key
                    )));
                }
                let evidence = Evidence::from_buckets(entry.buckets);
                if evidence.distinct_values() < 2 {
                    return Err(ReferenceError::table_malformed(format!(
                        "{} {:?}: fewer than two distinct values carry no evidence",
                        book, entry.key
                    )));
                }
                if !evidence.is_partition() {
                    return Err(ReferenceError::table_malformed(format!(
                        "{} {:?}: a scheme appears in more than one bucket",
                        book, entry.key
                    )));
                }

                let duplicate = match entry.key {
                    EntryKey::ChapterLastVerse { chapter } => {
                        div.chapters.insert(chapter, evidence).is_some()
                    }
                    EntryKey::BookLastChapter => div.book_length.replace(evidence).is_some(),
                };
                if duplicate {
                    return Err(ReferenceError::table_malformed(format!(
                        "{} {:?}: duplicate key",
                        book, entry.key
                    )));
                }
            }

            books.insert(book, div);
        }

        Ok(DivergenceTable::from_books(books))
    }

    /// Checks that the artifact was built from exactly these references.
    pub fn verify_against(&self, references: &ReferenceSet) -> ReferenceResult<()> {
        for (file, actual) in references.checksums() {
            let recorded = self
                .reference_checksums
                .get(file)
                .map(String::as_str)
                .unwrap_or("<none>");
            if recorded != actual {
                return Err(ReferenceError::table_stale(file, recorded, actual));
            }
        }
        Ok(())
    }

    /// Serializes the artifact to pretty-printed JSON.
    pub fn to_json(&self) -> ReferenceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ReferenceError::table_malformed(format!("Failed to serialize divergence table: {}", e))
        })
    }

    /// Deserializes an artifact from JSON.
    pub fn from_json(json: &str) -> ReferenceResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            ReferenceError::table_malformed(format!("Failed to parse divergence table: {}", e))
        })
    }

    /// Writes the artifact to a file with fsync.
    ///
    /// The JSON is staged next to `path` and renamed over it, so a failed
    /// write leaves any previous artifact intact.
    pub fn write_to_file(&self, path: &Path) -> ReferenceResult<()> {
        let json = self.to_json()?;
        let display = path.display().to_string();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut staged = NamedTempFile::new_in(dir).map_err(|e| {
            ReferenceError::table_io(&display, "Failed to create divergence table file", e)
        })?;

        staged.write_all(json.as_bytes()).map_err(|e| {
            ReferenceError::table_io(&display, "Failed to write divergence table", e)
        })?;

        staged.as_file().sync_all().map_err(|e| {
            ReferenceError::table_io(&display, "Failed to fsync divergence table", e)
        })?;

        staged.persist(path).map_err(|e| {
            ReferenceError::table_io(&display, "Failed to replace divergence table", e.error)
        })?;

        Ok(())
    }

    /// Reads an artifact from a file.
    pub fn read_from_file(path: &Path) -> ReferenceResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReferenceError::table_io(
                path.display().to_string(),
                "Failed to read divergence table",
                e,
            )
        })?;
        Self::from_json(&json)
    }
}

impl DivergenceTable {
    /// The checkpoint table shipped with the binary.
    ///
    /// Covers the diagnostic chapters of Daniel, Job, John, Acts and Romans.
    pub fn shipped() -> ReferenceResult<DivergenceTable> {
        TableArtifact::from_json(SHIPPED_TABLE)?.into_table()
    }
}
