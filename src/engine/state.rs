//! Candidate state for one inference run

use serde::Serialize;

use crate::canon::SchemeSet;
use crate::reference::Evidence;

/// Effect of one piece of evidence on the candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Observed value is in no bucket; nothing is falsified
    Uninformative,
    /// Candidates shrank
    Narrowed,
    /// Evidence agrees with every remaining candidate
    Corroborated,
    /// Evidence would leave no candidate; the step was discarded
    Inconsistent,
}

impl StepOutcome {
    /// True when the observed value hit a bucket
    pub fn carried_evidence(&self) -> bool {
        !matches!(self, StepOutcome::Uninformative)
    }
}

/// Working state of one inference run.
///
/// Invariants, checked after every step:
/// - `candidates` is never empty and only shrinks
/// - `ruled_out` only grows
/// - `candidates ∩ ruled_out = ∅`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateState {
    candidates: SchemeSet,
    ruled_out: SchemeSet,
}

impl Default for CandidateState {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateState {
    /// All six schemes, nothing ruled out
    pub fn new() -> Self {
        Self {
            candidates: SchemeSet::all(),
            ruled_out: SchemeSet::empty(),
        }
    }

    pub fn candidates(&self) -> SchemeSet {
        self.candidates
    }

    pub fn ruled_out(&self) -> SchemeSet {
        self.ruled_out
    }

    /// True when exactly one candidate remains
    pub fn is_determined(&self) -> bool {
        self.candidates.len() == 1
    }

    /// Applies the observation of `observed` at a divergence point.
    ///
    /// The step is all-or-nothing: when it would empty the candidate set,
    /// neither `candidates` nor `ruled_out` changes.
    pub fn apply(&mut self, evidence: &Evidence, observed: u32) -> StepOutcome {
        if !evidence.has_value(observed) {
            return StepOutcome::Uninformative;
        }

        let ruled_out = self.ruled_out.union(evidence.conflicting(observed));
        let narrowed = evidence
            .matched(observed)
            .intersection(self.candidates)
            .difference(ruled_out);

        let outcome = if narrowed.is_empty() {
            StepOutcome::Inconsistent
        } else if narrowed.len() < self.candidates.len() {
            self.candidates = narrowed;
            self.ruled_out = ruled_out;
            StepOutcome::Narrowed
        } else {
            self.ruled_out = ruled_out;
            StepOutcome::Corroborated
        };

        debug_assert!(!self.candidates.is_empty());
        debug_assert!(self.candidates.is_disjoint(&self.ruled_out));
        outcome
    }
}
