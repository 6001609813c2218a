//! Canonical book identifiers

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Number of protocanonical books (39 OT + 27 NT).
pub const PROTOCANONICAL_COUNT: usize = 66;

const OLD_TESTAMENT_COUNT: usize = 39;

/// Book codes in canonical order: OT, NT, then deuterocanonical books.
const BOOK_CODES: [&str; 86] = [
    // Old Testament
    "GEN", "EXO", "LEV", "NUM", "DEU", "JOS", "JDG", "RUT", "1SA", "2SA", "1KI", "2KI", "1CH",
    "2CH", "EZR", "NEH", "EST", "JOB", "PSA", "PRO", "ECC", "SNG", "ISA", "JER", "LAM", "EZK",
    "DAN", "HOS", "JOL", "AMO", "OBA", "JON", "MIC", "NAM", "HAB", "ZEP", "HAG", "ZEC", "MAL",
    // New Testament
    "MAT", "MRK", "LUK", "JHN", "ACT", "ROM", "1CO", "2CO", "GAL", "EPH", "PHP", "COL", "1TH",
    "2TH", "1TI", "2TI", "TIT", "PHM", "HEB", "JAS", "1PE", "2PE", "1JN", "2JN", "3JN", "JUD",
    "REV",
    // Deuterocanon
    "TOB", "JDT", "ESG", "WIS", "SIR", "BAR", "LJE", "S3Y", "SUS", "BEL", "1MA", "2MA", "3MA",
    "4MA", "1ES", "2ES", "MAN", "PS2", "ODA", "PSS",
];

/// A canonical Scripture book code.
///
/// Ordering is canonical order, not alphabetical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(u8);

impl BookId {
    /// Parses a three-letter book code (case-insensitive).
    pub fn parse(code: &str) -> Option<BookId> {
        let code = code.trim();
        BOOK_CODES
            .iter()
            .position(|c| c.eq_ignore_ascii_case(code))
            .map(|i| BookId(i as u8))
    }

    /// Upper-case three-letter code
    pub fn code(self) -> &'static str {
        BOOK_CODES[self.0 as usize]
    }

    /// Zero-based canonical position
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_protocanonical(self) -> bool {
        self.index() < PROTOCANONICAL_COUNT
    }

    pub fn is_old_testament(self) -> bool {
        self.index() < OLD_TESTAMENT_COUNT
    }

    /// The 66 books every reference scheme must define, in canonical order.
    pub fn protocanonical() -> impl Iterator<Item = BookId> {
        (0..PROTOCANONICAL_COUNT).map(|i| BookId(i as u8))
    }

    /// Every known book, in canonical order.
    pub fn all() -> impl Iterator<Item = BookId> {
        (0..BOOK_CODES.len()).map(|i| BookId(i as u8))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        BookId::parse(&code)
            .ok_or_else(|| de::Error::custom(format!("unknown book code '{}'", code)))
    }
}
