//! Audit and settings emitter
//!
//! Persists a determination per translation: a `versification.json`
//! record and, when the language is known, a minimal Paratext
//! `Settings.xml`. Neither file is ever overwritten.

mod emitter;
mod errors;
mod record;

pub use emitter::{read_record, EmitOutcome, SettingsEmitter, RECORD_FILE_NAME, SETTINGS_FILE_NAME};
pub use errors::{SettingsError, SettingsResult};
pub use record::DeterminationRecord;
