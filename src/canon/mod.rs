//! Canonical vocabulary shared by every subsystem
//!
//! - `BookId`: validated book codes in canonical order
//! - `VersificationScheme`: the six recognised verse-numbering conventions
//! - `SchemeSet`: a compact set of schemes

mod book;
mod scheme;

pub use book::{BookId, PROTOCANONICAL_COUNT};
pub use scheme::{SchemeSet, VersificationScheme};
