//! Reference differential subsystem
//!
//! Turns the six canonical versification definitions into a divergence
//! table: the compact set of points where the schemes disagree, together
//! with which scheme predicts which observed value.
//!
//! # Design Principles
//!
//! - Built once, immutable afterwards, shared by reference
//! - Only keys with two or more distinct predicted values are stored
//! - Buckets for one key partition the schemes that predict anything there
//! - Malformed or incomplete reference data is FATAL
//! - Deterministic: ordered maps throughout

mod artifact;
mod differential;
mod errors;
mod parser;
mod table;

pub use artifact::{ArtifactEntry, EntryKey, TableArtifact, FORMAT_VERSION};
pub use differential::{build_table, DivergenceBuilder};
pub use errors::{ReferenceError, ReferenceErrorCode, ReferenceResult, Severity};
pub use parser::{checksum, ReferenceSet, SchemeLayout};
pub use table::{BookDivergence, DivergenceKey, DivergenceTable, Evidence};
