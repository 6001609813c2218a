//! Reference scheme loader
//!
//! Parses Paratext `.vrs` versification definitions. Only the per-chapter
//! last-verse lines matter here:
//!
//! ```text
//! # comment
//! GEN 1:31 2:25 3:24 ...
//! PSA 51:0 = PSA 51:1      (mapping, ignored)
//! -GEN 4:8                 (excluded verse, ignored)
//! ```
//!
//! A file missing any of the 66 protocanonical books, or carrying a line
//! that cannot be parsed, is a fatal configuration error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::canon::{BookId, VersificationScheme};
use crate::observability::{log_event_with_fields, Event};

use super::errors::{ReferenceError, ReferenceResult};

/// One scheme's full layout: the last verse of each chapter of each book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemeLayout {
    pub scheme: VersificationScheme,
    /// `books[book][i]` is the last verse of chapter `i + 1`
    pub books: BTreeMap<BookId, Vec<u32>>,
}

impl SchemeLayout {
    /// Parses a `.vrs` document.
    ///
    /// `origin` names the source in error messages.
    pub fn parse(scheme: VersificationScheme, origin: &str, text: &str) -> ReferenceResult<Self> {
        let mut books = BTreeMap::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with('-')
                || line.starts_with('&')
                || line.contains('=')
            {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let code = match tokens.next() {
                Some(code) => code,
                None => continue,
            };

            let book = match BookId::parse(code) {
                Some(book) => book,
                None => {
                    log_event_with_fields(
                        Event::ReferenceLineSkipped,
                        &[("file", origin), ("line", &line_no.to_string()), ("book", code)],
                    );
                    continue;
                }
            };

            let mut chapters = Vec::new();
            for token in tokens {
                let (chapter, last_verse) = parse_chapter_token(token).ok_or_else(|| {
                    ReferenceError::malformed(
                        origin,
                        line_no,
                        format!("invalid chapter token '{}' for {}", token, book),
                    )
                })?;

                let expected = chapters.len() as u32 + 1;
                if chapter != expected {
                    return Err(ReferenceError::malformed(
                        origin,
                        line_no,
                        format!("{} chapter {} found where chapter {} expected", book, chapter, expected),
                    ));
                }
                chapters.push(last_verse);
            }

            if chapters.is_empty() {
                return Err(ReferenceError::malformed(
                    origin,
                    line_no,
                    format!("{} has no chapters", book),
                ));
            }

            if books.insert(book, chapters).is_some() {
                return Err(ReferenceError::malformed(
                    origin,
                    line_no,
                    format!("{} is defined twice", book),
                ));
            }
        }

        for book in BookId::protocanonical() {
            if !books.contains_key(&book) {
                return Err(ReferenceError::book_missing(origin, book.code()));
            }
        }

        Ok(Self { scheme, books })
    }

    /// Per-chapter last verses of `book`, if defined.
    pub fn chapters(&self, book: BookId) -> Option<&[u32]> {
        self.books.get(&book).map(Vec::as_slice)
    }
}

/// Parses `c:v` into (chapter, last verse).
fn parse_chapter_token(token: &str) -> Option<(u32, u32)> {
    let (chapter, verse) = token.split_once(':')?;
    let chapter: u32 = chapter.parse().ok()?;
    let verse: u32 = verse.parse().ok()?;
    if chapter == 0 {
        return None;
    }
    Some((chapter, verse))
}

/// The six parsed reference schemes, with the checksum of each source.
#[derive(Debug, Clone)]
pub struct ReferenceSet {
    /// Indexed by `scheme.id() - 1`
    layouts: Vec<SchemeLayout>,
    /// file name -> "crc32:xxxxxxxx"
    checksums: BTreeMap<String, String>,
}

impl ReferenceSet {
    /// Loads `org.vrs`, `lxx.vrs`, `vul.vrs`, `eng.vrs`, `rsc.vrs` and `rso.vrs`
    /// from `dir`.
    pub fn load(dir: &Path) -> ReferenceResult<Self> {
        let mut sources = Vec::with_capacity(VersificationScheme::ALL.len());

        for scheme in VersificationScheme::ALL {
            let path = dir.join(scheme.reference_file_name());
            let text = fs::read_to_string(&path)
                .map_err(|e| ReferenceError::missing(path.display().to_string(), e))?;
            sources.push((scheme, text));
        }

        let result = Self::from_sources(
            sources
                .iter()
                .map(|(scheme, text)| (*scheme, text.as_str())),
        );
        if let Err(ref e) = result {
            log_event_with_fields(
                Event::ReferenceRejected,
                &[("code", e.code().code()), ("message", e.message())],
            );
        }
        result
    }

    /// Builds a reference set from in-memory `.vrs` documents.
    ///
    /// Every scheme must be supplied exactly once.
    pub fn from_sources<'a, I>(sources: I) -> ReferenceResult<Self>
    where
        I: IntoIterator<Item = (VersificationScheme, &'a str)>,
    {
        let mut slots: Vec<Option<SchemeLayout>> = vec![None; VersificationScheme::ALL.len()];
        let mut checksums = BTreeMap::new();

        for (scheme, text) in sources {
            let origin = scheme.reference_file_name();
            let layout = SchemeLayout::parse(scheme, origin, text)?;

            let slot = &mut slots[scheme.id() as usize - 1];
            if slot.is_some() {
                return Err(ReferenceError::malformed(
                    origin,
                    0,
                    format!("{} reference supplied twice", scheme),
                ));
            }

            log_event_with_fields(
                Event::ReferenceLoaded,
                &[("file", origin), ("books", &layout.books.len().to_string())],
            );

            *slot = Some(layout);
            checksums.insert(origin.to_string(), checksum(text.as_bytes()));
        }

        let mut layouts = Vec::with_capacity(slots.len());
        for (slot, scheme) in slots.into_iter().zip(VersificationScheme::ALL) {
            let layout = slot.ok_or_else(|| {
                ReferenceError::missing(
                    scheme.reference_file_name(),
                    std::io::Error::new(std::io::ErrorKind::NotFound, "not supplied"),
                )
            })?;
            layouts.push(layout);
        }

        Ok(Self { layouts, checksums })
    }

    /// Layout of one scheme
    pub fn layout(&self, scheme: VersificationScheme) -> &SchemeLayout {
        &self.layouts[scheme.id() as usize - 1]
    }

    /// All layouts in scheme id order
    pub fn layouts(&self) -> impl Iterator<Item = &SchemeLayout> {
        self.layouts.iter()
    }

    /// Per-file CRC32 checksums, keyed by reference file name
    pub fn checksums(&self) -> &BTreeMap<String, String> {
        &self.checksums
    }
}

/// Formats a CRC32 checksum the way artifacts record it.
pub fn checksum(bytes: &[u8]) -> String {
    format!("crc32:{:08x}", crc32fast::hash(bytes))
}
