//! Final answer of one inference run

use std::fmt;

use serde::Serialize;

use crate::canon::{SchemeSet, VersificationScheme};

use super::state::CandidateState;

/// Terminal state of an inference run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Exactly one candidate remained
    Determined,
    /// Evidence was seen but several candidates remain
    Exhausted,
    /// No event ever carried evidence
    Undetermined,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Determined => "determined",
            Outcome::Exhausted => "exhausted",
            Outcome::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scheme a translation is taken to follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Determination {
    pub scheme: VersificationScheme,
    /// True only when evidence left a single candidate
    pub certain: bool,
    /// Candidates not eliminated, in priority order
    pub remaining_candidates: Vec<VersificationScheme>,
}

impl Determination {
    /// Picks the answer from a finished state.
    ///
    /// The first remaining candidate in priority order wins; with all six
    /// remaining that is English.
    pub fn from_state(state: &CandidateState) -> Self {
        Self::from_candidates(state.candidates())
    }

    pub(crate) fn from_candidates(candidates: SchemeSet) -> Self {
        let remaining_candidates = candidates.in_priority_order();
        let scheme = remaining_candidates
            .first()
            .copied()
            .unwrap_or(VersificationScheme::English);
        Self {
            scheme,
            certain: remaining_candidates.len() == 1,
            remaining_candidates,
        }
    }
}

impl fmt::Display for Determination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.certain {
            write!(f, "{} ({})", self.scheme, self.scheme.id())
        } else {
            let names: Vec<&str> = self.remaining_candidates.iter().map(|s| s.name()).collect();
            write!(
                f,
                "{} ({}), guessed from [{}]",
                self.scheme,
                self.scheme.id(),
                names.join(", ")
            )
        }
    }
}
