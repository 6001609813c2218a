//! Checkpoint decision tree
//!
//! The older fixed-checkpoint way of guessing versification: read the last
//! verse of a handful of chapters and walk a hand-written decision tree.
//! The candidate engine is authoritative; this exists only so that a
//! disagreement between the two can be flagged for a curator. The two are
//! never reconciled.

use crate::canon::{BookId, VersificationScheme};
use crate::scanner::BoundaryEvent;

/// Last verses of the checkpoint chapters, where observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checkpoints {
    pub dan_3: Option<u32>,
    pub dan_5: Option<u32>,
    pub dan_13: Option<u32>,
    pub jhn_6: Option<u32>,
    pub act_19: Option<u32>,
    pub rom_16: Option<u32>,
}

impl Checkpoints {
    /// Books holding checkpoint chapters.
    pub fn is_checkpoint_book(book: BookId) -> bool {
        matches!(book.code(), "DAN" | "JHN" | "ACT" | "ROM")
    }

    /// Collects checkpoint values from a complete event sequence.
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a BoundaryEvent>,
    {
        let mut checkpoints = Self::default();
        for event in events {
            let slot = match (event.book.code(), event.chapter) {
                ("DAN", 3) => &mut checkpoints.dan_3,
                ("DAN", 5) => &mut checkpoints.dan_5,
                ("DAN", 13) => &mut checkpoints.dan_13,
                ("JHN", 6) => &mut checkpoints.jhn_6,
                ("ACT", 19) => &mut checkpoints.act_19,
                ("ROM", 16) => &mut checkpoints.rom_16,
                _ => continue,
            };
            *slot = Some(event.last_verse);
        }
        checkpoints
    }

    /// Walks the decision tree. `None` when no branch applies.
    ///
    /// Old Testament checkpoints are consulted only when the project has
    /// Old Testament books.
    pub fn conclude(&self, has_old_testament: bool) -> Option<VersificationScheme> {
        let from_ot = if has_old_testament {
            self.conclude_from_old_testament()
        } else {
            None
        };
        from_ot.or_else(|| self.conclude_from_new_testament())
    }

    fn conclude_from_old_testament(&self) -> Option<VersificationScheme> {
        use VersificationScheme::*;

        match (self.dan_3, self.dan_5) {
            (Some(30), _) => Some(English),
            (Some(33), Some(30)) => Some(Original),
            (Some(33), Some(31)) => Some(RussianProtestant),
            (Some(97), _) => Some(Septuagint),
            (Some(100), _) if self.dan_13 == Some(65) => Some(Vulgate),
            (Some(100), _) => Some(RussianOrthodox),
            _ => None,
        }
    }

    fn conclude_from_new_testament(&self) -> Option<VersificationScheme> {
        use VersificationScheme::*;

        if self.jhn_6 == Some(72) {
            Some(Vulgate)
        } else if self.act_19 == Some(41) {
            Some(English)
        } else if self.rom_16 == Some(24) {
            // Russian Protestant predicts the same
            Some(RussianOrthodox)
        } else if self.jhn_6 == Some(71) && self.act_19 == Some(40) {
            // Septuagint predicts the same
            Some(Original)
        } else {
            None
        }
    }
}
