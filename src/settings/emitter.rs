//! Per-translation record writer
//!
//! Writes the determination next to the translation's sources. Existing
//! files are never overwritten: a project that already carries a record is
//! skipped, so rerunning a batch leaves curated files alone.
//!
//! Contents are staged in a temporary file in the project directory and
//! moved into place only once fully written and synced. A failed write
//! leaves no partial file behind.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::engine::Determination;
use crate::observability::{log_event_with_fields, Event};

use super::errors::{SettingsError, SettingsResult};
use super::record::DeterminationRecord;

/// File name of the determination record
pub const RECORD_FILE_NAME: &str = "versification.json";

/// File name of the Paratext project settings
pub const SETTINGS_FILE_NAME: &str = "Settings.xml";

/// What an emit call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmitOutcome {
    Written(PathBuf),
    /// A file was already present and left untouched
    Skipped(PathBuf),
}

impl EmitOutcome {
    pub fn path(&self) -> &Path {
        match self {
            EmitOutcome::Written(p) | EmitOutcome::Skipped(p) => p,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, EmitOutcome::Written(_))
    }
}

/// Emits records into one project directory.
#[derive(Debug, Clone)]
pub struct SettingsEmitter {
    project_dir: PathBuf,
}

impl SettingsEmitter {
    /// Fails if `project_dir` is not an existing directory.
    pub fn new(project_dir: impl Into<PathBuf>) -> SettingsResult<Self> {
        let project_dir = project_dir.into();
        if !project_dir.is_dir() {
            return Err(SettingsError::ProjectNotFound(project_dir));
        }
        Ok(Self { project_dir })
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn record_path(&self) -> PathBuf {
        self.project_dir.join(RECORD_FILE_NAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.project_dir.join(SETTINGS_FILE_NAME)
    }

    /// Writes `versification.json` unless it already exists.
    pub fn emit_record(&self, determination: &Determination) -> SettingsResult<EmitOutcome> {
        let record = DeterminationRecord::from_determination(determination);
        let json = record.to_json()?;
        self.emit(self.record_path(), &json)
    }

    /// Writes a minimal `Settings.xml` unless it already exists.
    pub fn emit_settings_xml(
        &self,
        determination: &Determination,
        language_code: &str,
        translation_id: &str,
    ) -> SettingsResult<EmitOutcome> {
        let xml = render_settings_xml(determination, language_code, translation_id);
        self.emit(self.settings_path(), &xml)
    }

    fn emit(&self, path: PathBuf, contents: &str) -> SettingsResult<EmitOutcome> {
        self.emit_with(path, |file| file.write_all(contents.as_bytes()))
    }

    fn emit_with<W>(&self, path: PathBuf, write: W) -> SettingsResult<EmitOutcome>
    where
        W: FnOnce(&mut File) -> io::Result<()>,
    {
        let display = path.display().to_string();
        if path.exists() {
            log_event_with_fields(Event::RecordSkipped, &[("path", &display)]);
            return Ok(EmitOutcome::Skipped(path));
        }

        let staged = match stage(&self.project_dir, write) {
            Ok(staged) => staged,
            Err(source) => return Err(SettingsError::Write { path, source }),
        };

        match staged.persist_noclobber(&path) {
            Ok(_) => {
                log_event_with_fields(Event::RecordWritten, &[("path", &display)]);
                Ok(EmitOutcome::Written(path))
            }
            // Lost a race with another writer; the staged file is dropped.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                log_event_with_fields(Event::RecordSkipped, &[("path", &display)]);
                Ok(EmitOutcome::Skipped(path))
            }
            Err(e) => Err(SettingsError::Write {
                path,
                source: e.error,
            }),
        }
    }
}

/// Loads the determination record of `project_dir`.
pub fn read_record(project_dir: &Path) -> SettingsResult<DeterminationRecord> {
    let path = project_dir.join(RECORD_FILE_NAME);
    let json = std::fs::read_to_string(&path).map_err(|source| SettingsError::Read {
        path: path.clone(),
        source,
    })?;

    let record: DeterminationRecord =
        serde_json::from_str(&json).map_err(|e| SettingsError::InvalidRecord {
            path: path.clone(),
            reason: e.to_string(),
        })?;

    record
        .determination()
        .map_err(|reason| SettingsError::InvalidRecord { path, reason })?;

    Ok(record)
}

/// Writes and syncs a temporary file in `dir`, removed again on drop.
fn stage<W>(dir: &Path, write: W) -> io::Result<NamedTempFile>
where
    W: FnOnce(&mut File) -> io::Result<()>,
{
    let mut staged = NamedTempFile::new_in(dir)?;
    write(staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    Ok(staged)
}

fn render_settings_xml(
    determination: &Determination,
    language_code: &str,
    translation_id: &str,
) -> String {
    format!(
        "<ScriptureText>\n  \
         <Versification>{}</Versification>\n  \
         <LanguageIsoCode>{}:::</LanguageIsoCode>\n  \
         <Naming BookNameForm=\"41-MAT\" PostPart=\"{}.usfm\" PrePart=\"\" />\n\
         </ScriptureText>\n",
        determination.scheme.id(),
        escape_xml(language_code),
        escape_xml(translation_id),
    )
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::VersificationScheme::*;
    use tempfile::TempDir;

    fn english() -> Determination {
        Determination {
            scheme: English,
            certain: true,
            remaining_candidates: vec![English],
        }
    }

    #[test]
    fn test_settings_xml_contents() {
        let xml = render_settings_xml(&english(), "eng", "eng-web");
        assert_eq!(
            xml,
            "<ScriptureText>\n  <Versification>4</Versification>\n  \
             <LanguageIsoCode>eng:::</LanguageIsoCode>\n  \
             <Naming BookNameForm=\"41-MAT\" PostPart=\"eng-web.usfm\" PrePart=\"\" />\n\
             </ScriptureText>\n"
        );
    }

    #[test]
    fn test_settings_xml_escapes_attributes() {
        let xml = render_settings_xml(&english(), "x", "a\"b&c");
        assert!(xml.contains("PostPart=\"a&quot;b&amp;c.usfm\""));
    }

    #[test]
    fn test_emit_skips_existing_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(RECORD_FILE_NAME), "curated").unwrap();

        let emitter = SettingsEmitter::new(dir.path()).unwrap();
        let outcome = emitter.emit_record(&english()).unwrap();

        assert!(!outcome.is_written());
        assert_eq!(
            std::fs::read_to_string(dir.path().join(RECORD_FILE_NAME)).unwrap(),
            "curated"
        );
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let emitter = SettingsEmitter::new(dir.path()).unwrap();

        let err = emitter
            .emit_with(emitter.record_path(), |file| {
                file.write_all(b"{\"versificationId\": ")?;
                Err(io::Error::new(io::ErrorKind::Other, "device full"))
            })
            .unwrap_err();
        assert_eq!(err.code(), "VRS_SETTINGS_WRITE_FAILED");
        assert!(!emitter.record_path().exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // The next run writes the record instead of skipping a fragment.
        assert!(emitter.emit_record(&english()).unwrap().is_written());
        assert!(read_record(dir.path()).is_ok());
    }

    #[test]
    fn test_missing_project_dir_rejected() {
        let dir = TempDir::new().unwrap();
        let err = SettingsEmitter::new(dir.path().join("absent")).unwrap_err();
        assert_eq!(err.code(), "VRS_SETTINGS_PROJECT_NOT_FOUND");
    }
}
