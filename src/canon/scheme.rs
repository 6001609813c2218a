//! Versification schemes and scheme sets

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the six canonical verse-numbering conventions.
///
/// The discriminant is the stable numeric id used in persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VersificationScheme {
    Original = 1,
    Septuagint = 2,
    Vulgate = 3,
    English = 4,
    RussianProtestant = 5,
    RussianOrthodox = 6,
}

impl VersificationScheme {
    /// All schemes in id order.
    pub const ALL: [VersificationScheme; 6] = [
        VersificationScheme::Original,
        VersificationScheme::Septuagint,
        VersificationScheme::Vulgate,
        VersificationScheme::English,
        VersificationScheme::RussianProtestant,
        VersificationScheme::RussianOrthodox,
    ];

    /// Tie-break order. Never used for scoring.
    pub const PRIORITY: [VersificationScheme; 6] = [
        VersificationScheme::English,
        VersificationScheme::Original,
        VersificationScheme::RussianProtestant,
        VersificationScheme::RussianOrthodox,
        VersificationScheme::Septuagint,
        VersificationScheme::Vulgate,
    ];

    /// Numeric identifier (1..=6)
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Inverse of [`id`](Self::id).
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.id() == id)
    }

    /// Position in [`PRIORITY`](Self::PRIORITY); lower wins.
    pub fn priority_rank(self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|s| *s == self)
            .unwrap_or(Self::PRIORITY.len())
    }

    /// File name of this scheme's Paratext reference definition.
    pub fn reference_file_name(self) -> &'static str {
        match self {
            VersificationScheme::Original => "org.vrs",
            VersificationScheme::Septuagint => "lxx.vrs",
            VersificationScheme::Vulgate => "vul.vrs",
            VersificationScheme::English => "eng.vrs",
            VersificationScheme::RussianProtestant => "rsc.vrs",
            VersificationScheme::RussianOrthodox => "rso.vrs",
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            VersificationScheme::Original => "Original",
            VersificationScheme::Septuagint => "Septuagint",
            VersificationScheme::Vulgate => "Vulgate",
            VersificationScheme::English => "English",
            VersificationScheme::RussianProtestant => "Russian Protestant",
            VersificationScheme::RussianOrthodox => "Russian Orthodox",
        }
    }

    fn bit(self) -> u8 {
        1 << (self.id() - 1)
    }
}

impl fmt::Display for VersificationScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of versification schemes.
///
/// Six members fit in one byte, so the set is `Copy` and set algebra is a
/// single bitwise operation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SchemeSet(u8);

impl SchemeSet {
    const FULL: u8 = 0b0011_1111;

    pub const fn empty() -> Self {
        SchemeSet(0)
    }

    pub const fn all() -> Self {
        SchemeSet(Self::FULL)
    }

    pub fn of(schemes: &[VersificationScheme]) -> Self {
        schemes.iter().copied().collect()
    }

    pub fn single(scheme: VersificationScheme) -> Self {
        SchemeSet(scheme.bit())
    }

    pub fn insert(&mut self, scheme: VersificationScheme) {
        self.0 |= scheme.bit();
    }

    pub fn remove(&mut self, scheme: VersificationScheme) {
        self.0 &= !scheme.bit();
    }

    pub fn contains(&self, scheme: VersificationScheme) -> bool {
        self.0 & scheme.bit() != 0
    }

    pub fn union(self, other: SchemeSet) -> SchemeSet {
        SchemeSet(self.0 | other.0)
    }

    pub fn intersection(self, other: SchemeSet) -> SchemeSet {
        SchemeSet(self.0 & other.0)
    }

    pub fn difference(self, other: SchemeSet) -> SchemeSet {
        SchemeSet(self.0 & !other.0)
    }

    pub fn is_disjoint(&self, other: &SchemeSet) -> bool {
        self.0 & other.0 == 0
    }

    pub fn is_subset(&self, other: &SchemeSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Members in id order.
    pub fn iter(&self) -> impl Iterator<Item = VersificationScheme> + '_ {
        VersificationScheme::ALL
            .into_iter()
            .filter(move |s| self.contains(*s))
    }

    /// Members in tie-break order.
    pub fn in_priority_order(&self) -> Vec<VersificationScheme> {
        VersificationScheme::PRIORITY
            .into_iter()
            .filter(|s| self.contains(*s))
            .collect()
    }

    /// Highest-priority member, if any.
    pub fn first_by_priority(&self) -> Option<VersificationScheme> {
        VersificationScheme::PRIORITY
            .into_iter()
            .find(|s| self.contains(*s))
    }

    /// The only member, when there is exactly one.
    pub fn sole(&self) -> Option<VersificationScheme> {
        if self.len() == 1 {
            self.iter().next()
        } else {
            None
        }
    }
}

impl FromIterator<VersificationScheme> for SchemeSet {
    fn from_iter<I: IntoIterator<Item = VersificationScheme>>(iter: I) -> Self {
        let mut set = SchemeSet::empty();
        for scheme in iter {
            set.insert(scheme);
        }
        set
    }
}

impl fmt::Debug for SchemeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for SchemeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|s| s.name()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

impl Serialize for SchemeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for SchemeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let schemes = Vec::<VersificationScheme>::deserialize(deserializer)?;
        Ok(schemes.into_iter().collect())
    }
}
