//! Settings Emitter Tests
//!
//! - The record and Settings.xml carry the determination
//! - Existing files are never overwritten
//! - Output depends only on the inputs

use std::fs;

use tempfile::TempDir;
use versifier::canon::VersificationScheme::*;
use versifier::engine::Determination;
use versifier::settings::{
    read_record, DeterminationRecord, EmitOutcome, SettingsEmitter, RECORD_FILE_NAME,
    SETTINGS_FILE_NAME,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn russian_tie() -> Determination {
    Determination {
        scheme: RussianProtestant,
        certain: false,
        remaining_candidates: vec![RussianProtestant, RussianOrthodox],
    }
}

fn vulgate() -> Determination {
    Determination {
        scheme: Vulgate,
        certain: true,
        remaining_candidates: vec![Vulgate],
    }
}

// =============================================================================
// Record Tests
// =============================================================================

/// The record lands in versification.json and reads back unchanged.
#[test]
fn test_record_written_and_read_back() {
    let tmp = TempDir::new().unwrap();
    let emitter = SettingsEmitter::new(tmp.path()).unwrap();

    let outcome = emitter.emit_record(&russian_tie()).unwrap();
    assert_eq!(outcome, EmitOutcome::Written(tmp.path().join(RECORD_FILE_NAME)));

    let record = read_record(tmp.path()).unwrap();
    assert_eq!(
        record,
        DeterminationRecord {
            versification_id: 5,
            certain: false,
            candidates: vec![5, 6],
        }
    );
    assert_eq!(record.determination().unwrap(), russian_tie());
}

/// The JSON uses camelCase keys.
#[test]
fn test_record_json_shape() {
    let tmp = TempDir::new().unwrap();
    SettingsEmitter::new(tmp.path())
        .unwrap()
        .emit_record(&vulgate())
        .unwrap();

    let json = fs::read_to_string(tmp.path().join(RECORD_FILE_NAME)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"versificationId": 3, "certain": true, "candidates": [3]})
    );
}

/// A second emit leaves the first file in place.
#[test]
fn test_existing_record_not_overwritten() {
    let tmp = TempDir::new().unwrap();
    let emitter = SettingsEmitter::new(tmp.path()).unwrap();

    assert!(emitter.emit_record(&vulgate()).unwrap().is_written());
    let before = fs::read(tmp.path().join(RECORD_FILE_NAME)).unwrap();

    let outcome = emitter.emit_record(&russian_tie()).unwrap();
    assert!(matches!(outcome, EmitOutcome::Skipped(_)));
    assert_eq!(fs::read(tmp.path().join(RECORD_FILE_NAME)).unwrap(), before);
}

/// A hand-edited record with unknown ids is rejected on read.
#[test]
fn test_invalid_record_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(RECORD_FILE_NAME),
        r#"{"versificationId": 7, "certain": true, "candidates": [7]}"#,
    )
    .unwrap();

    let err = read_record(tmp.path()).unwrap_err();
    assert_eq!(err.code(), "VRS_SETTINGS_INVALID_RECORD");
}

// =============================================================================
// Settings.xml Tests
// =============================================================================

/// Settings.xml names the scheme id, the language and the book file pattern.
#[test]
fn test_settings_xml_written() {
    let tmp = TempDir::new().unwrap();
    let emitter = SettingsEmitter::new(tmp.path()).unwrap();

    let outcome = emitter
        .emit_settings_xml(&vulgate(), "lat", "lat-vulgata")
        .unwrap();
    assert_eq!(outcome.path(), tmp.path().join(SETTINGS_FILE_NAME));

    let xml = fs::read_to_string(tmp.path().join(SETTINGS_FILE_NAME)).unwrap();
    assert!(xml.contains("<Versification>3</Versification>"));
    assert!(xml.contains("<LanguageIsoCode>lat:::</LanguageIsoCode>"));
    assert!(xml.contains("<Naming BookNameForm=\"41-MAT\" PostPart=\"lat-vulgata.usfm\" PrePart=\"\" />"));
}

/// Identical inputs give byte-identical files in different projects.
#[test]
fn test_output_depends_only_on_inputs() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();

    for dir in [a.path(), b.path()] {
        let emitter = SettingsEmitter::new(dir).unwrap();
        emitter.emit_record(&russian_tie()).unwrap();
        emitter.emit_settings_xml(&russian_tie(), "rus", "rus-syn").unwrap();
    }

    for name in [RECORD_FILE_NAME, SETTINGS_FILE_NAME] {
        assert_eq!(
            fs::read(a.path().join(name)).unwrap(),
            fs::read(b.path().join(name)).unwrap()
        );
    }
}
