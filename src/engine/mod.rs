//! Versification candidate engine
//!
//! Narrows the six schemes down by eliminating every scheme whose
//! prediction at a divergence point contradicts what the translation shows.
//!
//! # Design Principles
//!
//! - Pure fold over boundary events; no I/O, no shared mutable state
//! - Candidate set never empty, only shrinks
//! - Early termination once one candidate remains
//! - Deterministic tie-break by fixed priority, English first
//! - Ambiguity is an outcome (`certain = false`), never an error

mod candidate;
mod determination;
mod legacy;
mod state;

pub use candidate::{AuditStep, CandidateEngine, Inference};
pub use determination::{Determination, Outcome};
pub use legacy::Checkpoints;
pub use state::{CandidateState, StepOutcome};
