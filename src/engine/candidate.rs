//! Versification candidate engine
//!
//! A fold over a translation's boundary events with a [`CandidateState`]
//! accumulator:
//!
//! 1. On the last event of a book, look up the book's chapter-count key
//!    with the observed chapter number.
//! 2. Otherwise, or when step 1 finds no matching bucket, look up the
//!    chapter's last-verse key with the observed last verse.
//! 3. Apply the evidence; stop as soon as one candidate remains.
//!
//! The engine performs no I/O and holds no state between runs.

use std::iter::Peekable;

use serde::Serialize;

use crate::canon::{SchemeSet, VersificationScheme};
use crate::observability::{log_event_with_fields, Event};
use crate::reference::{DivergenceKey, DivergenceTable, Evidence};
use crate::scanner::BoundaryEvent;

use super::determination::{Determination, Outcome};
use super::state::{CandidateState, StepOutcome};

/// One evidence-bearing step, kept for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditStep {
    pub event: BoundaryEvent,
    pub key: DivergenceKey,
    /// Value compared against the buckets (chapter count or last verse)
    pub observed: u32,
    pub outcome: StepOutcome,
    /// Candidates after the step, in priority order
    pub candidates: Vec<VersificationScheme>,
}

/// Result of one inference run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inference {
    pub determination: Determination,
    pub outcome: Outcome,
    /// Boundary events pulled from the source
    pub events_consumed: usize,
    /// Events whose observed value hit a bucket
    pub evidence_events: usize,
    pub trail: Vec<AuditStep>,
}

/// Infers a translation's scheme against a shared divergence table.
#[derive(Debug, Clone, Copy)]
pub struct CandidateEngine<'t> {
    table: &'t DivergenceTable,
}

impl<'t> CandidateEngine<'t> {
    pub fn new(table: &'t DivergenceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'t DivergenceTable {
        self.table
    }

    /// Runs inference over `events`, in order.
    ///
    /// Stops pulling events once a single candidate remains.
    pub fn determine<I>(&self, events: I) -> Inference
    where
        I: IntoIterator<Item = BoundaryEvent>,
    {
        let mut events = events.into_iter().peekable();
        let mut state = CandidateState::new();
        let mut events_consumed = 0;
        let mut evidence_events = 0;
        let mut trail = Vec::new();

        while let Some(event) = events.next() {
            events_consumed += 1;

            let Some((key, evidence, observed)) = self.lookup(&event, &mut events) else {
                continue;
            };

            let outcome = state.apply(evidence, observed);
            if !outcome.carried_evidence() {
                continue;
            }
            evidence_events += 1;

            self.log_step(&event, &key, outcome, state.candidates());
            trail.push(AuditStep {
                event,
                key,
                observed,
                outcome,
                candidates: state.candidates().in_priority_order(),
            });

            if state.is_determined() {
                break;
            }
        }

        let outcome = if state.is_determined() {
            Outcome::Determined
        } else if evidence_events == 0 {
            Outcome::Undetermined
        } else {
            Outcome::Exhausted
        };

        let determination = Determination::from_state(&state);
        log_event_with_fields(
            match outcome {
                Outcome::Determined => Event::Determined,
                Outcome::Exhausted => Event::Exhausted,
                Outcome::Undetermined => Event::Undetermined,
            },
            &[
                ("scheme", determination.scheme.name()),
                ("candidates", &state.candidates().to_string()),
                ("events", &events_consumed.to_string()),
                ("evidence_events", &evidence_events.to_string()),
            ],
        );

        Inference {
            determination,
            outcome,
            events_consumed,
            evidence_events,
            trail,
        }
    }

    /// Finds the evidence an event speaks to.
    ///
    /// The chapter-count key is used only when the observed count is one of
    /// its buckets and the event is the book's last; otherwise the chapter's
    /// last-verse key is tried. The source is peeked only in the first case.
    fn lookup<I>(
        &self,
        event: &BoundaryEvent,
        rest: &mut Peekable<I>,
    ) -> Option<(DivergenceKey, &'t Evidence, u32)>
    where
        I: Iterator<Item = BoundaryEvent>,
    {
        let key = DivergenceKey::BookLastChapter { book: event.book };
        if let Some(evidence) = self.table.evidence(&key) {
            if evidence.has_value(event.chapter) && is_final_chapter(event, rest) {
                return Some((key, evidence, event.chapter));
            }
        }

        let key = DivergenceKey::ChapterLastVerse {
            book: event.book,
            chapter: event.chapter,
        };
        self.table
            .evidence(&key)
            .map(|evidence| (key, evidence, event.last_verse))
    }

    fn log_step(
        &self,
        event: &BoundaryEvent,
        key: &DivergenceKey,
        outcome: StepOutcome,
        candidates: SchemeSet,
    ) {
        let event_str = event.to_string();
        let key_str = key.to_string();
        let candidates_str = candidates.to_string();
        let fields = [
            ("event", event_str.as_str()),
            ("key", key_str.as_str()),
            ("candidates", candidates_str.as_str()),
        ];
        match outcome {
            StepOutcome::Inconsistent => log_event_with_fields(Event::InconsistentEvidence, &fields),
            _ => log_event_with_fields(Event::EvidenceApplied, &fields),
        }
    }
}

/// True when no later event belongs to the same book.
fn is_final_chapter<I>(event: &BoundaryEvent, rest: &mut Peekable<I>) -> bool
where
    I: Iterator<Item = BoundaryEvent>,
{
    rest.peek().map_or(true, |next| next.book != event.book)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::BookId;
    use crate::canon::VersificationScheme::*;

    fn ev(code: &str, chapter: u32, last_verse: u32) -> BoundaryEvent {
        BoundaryEvent::new(BookId::parse(code).unwrap(), chapter, last_verse)
    }

    fn shipped() -> DivergenceTable {
        DivergenceTable::shipped().unwrap()
    }

    #[test]
    fn test_daniel_3_ending_at_30_is_english() {
        let table = shipped();
        let inference = CandidateEngine::new(&table).determine(vec![ev("DAN", 3, 30)]);

        assert_eq!(inference.outcome, Outcome::Determined);
        assert_eq!(inference.determination.scheme, English);
        assert!(inference.determination.certain);
        assert_eq!(inference.determination.remaining_candidates, vec![English]);
    }

    #[test]
    fn test_daniel_3_then_5_separates_original() {
        let table = shipped();
        let inference = CandidateEngine::new(&table).determine(vec![
            ev("DAN", 1, 21),
            ev("DAN", 3, 33),
            ev("DAN", 4, 34),
            ev("DAN", 5, 30),
            ev("DAN", 6, 29),
        ]);
        assert_eq!(inference.determination.scheme, Original);
        assert_eq!(inference.events_consumed, 4);
        assert_eq!(inference.trail.len(), 2);
    }

    #[test]
    fn test_book_length_checked_on_final_chapter() {
        let table = shipped();
        let inference = CandidateEngine::new(&table).determine(vec![
            ev("DAN", 3, 100),
            ev("DAN", 12, 13),
            ev("DAN", 13, 64),
            ev("DAN", 14, 42),
        ]);
        // DAN 13 = 64 picks Russian Orthodox before the book ends.
        assert_eq!(inference.determination.scheme, RussianOrthodox);
        assert_eq!(inference.events_consumed, 3);
    }

    #[test]
    fn test_final_chapter_falls_back_to_last_verse() {
        let table = shipped();
        // ROM has no chapter-count key; chapter 16 is the final event.
        let inference = CandidateEngine::new(&table).determine(vec![ev("ROM", 16, 24)]);
        assert_eq!(inference.trail.len(), 1);
        assert!(matches!(
            inference.trail[0].key,
            DivergenceKey::ChapterLastVerse { chapter: 16, .. }
        ));
    }

    #[test]
    fn test_final_chapter_count_mismatch_falls_back() {
        let table = shipped();
        // DAN ends at chapter 13: no count bucket for 13, so the last-verse
        // key for chapter 13 is used instead.
        let inference = CandidateEngine::new(&table).determine(vec![ev("DAN", 13, 65)]);
        assert_eq!(inference.determination.scheme, Vulgate);
        assert!(inference.determination.certain);
    }

    #[test]
    fn test_chapter_count_key_applies() {
        let table = shipped();
        let inference = CandidateEngine::new(&table).determine(vec![ev("DAN", 14, 42)]);
        assert_eq!(inference.outcome, Outcome::Exhausted);
        assert_eq!(
            inference.determination.remaining_candidates,
            vec![RussianOrthodox, Vulgate]
        );
        assert_eq!(inference.determination.scheme, RussianOrthodox);
        assert!(matches!(inference.trail[0].key, DivergenceKey::BookLastChapter { .. }));
    }

    #[test]
    fn test_count_bucket_mid_book_uses_last_verse() {
        let table = shipped();
        // Chapter 12 is a count bucket, but DAN continues past it.
        let inference = CandidateEngine::new(&table)
            .determine(vec![ev("DAN", 12, 13), ev("DAN", 13, 65)]);
        assert_eq!(inference.determination.scheme, Vulgate);
        assert!(inference
            .trail
            .iter()
            .all(|step| matches!(step.key, DivergenceKey::ChapterLastVerse { .. })));
    }

    #[test]
    fn test_zero_verse_chapter_is_uninformative() {
        let table = shipped();
        let inference = CandidateEngine::new(&table).determine(vec![ev("JHN", 6, 0)]);
        assert_eq!(inference.outcome, Outcome::Undetermined);
        assert_eq!(inference.events_consumed, 1);
        assert_eq!(inference.evidence_events, 0);
    }
}
