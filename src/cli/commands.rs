//! CLI command implementations
//!
//! Each command loads the configuration, resolves one divergence table and
//! shares it by reference across every project it touches.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;

use crate::canon::VersificationScheme;
use crate::engine::{CandidateEngine, Checkpoints, Determination, Inference};
use crate::observability::{log_event_with_fields, Event};
use crate::reference::{build_table, DivergenceTable, TableArtifact};
use crate::scanner::{BoundaryEvent, BoundaryScanner, ProjectSource};
use crate::settings::{read_record, EmitOutcome, SettingsEmitter, SettingsError};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_json, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::BuildTable { config, output } => build(&config, output.as_deref()),
        Command::Infer { config, project } => infer(&config, &project),
        Command::WriteSettings {
            config,
            project,
            language,
            translation_id,
        } => write_settings(&config, &project, language.as_deref(), translation_id.as_deref()),
        Command::Batch { config } => batch(&config),
    }
}

/// Inference for one project, with the checkpoint cross-check.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: PathBuf,
    #[serde(flatten)]
    pub inference: Inference,
    /// What the checkpoint decision tree concluded, if anything
    pub checkpoint_scheme: Option<VersificationScheme>,
}

/// Whether a project's record was written or already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Written,
    Skipped,
}

/// Result of write-settings for one project.
#[derive(Debug, Clone, Serialize)]
pub struct SettingsReport {
    pub project: PathBuf,
    pub status: RecordStatus,
    pub determination: Determination,
    /// Settings.xml path when one was written
    pub settings_xml: Option<PathBuf>,
}

/// Counts printed at the end of a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
    pub projects: Vec<SettingsReport>,
}

/// Build the divergence table from reference files.
///
/// Writes the artifact to `output`, or prints it when no output is given.
pub fn build(config_path: &Path, output: Option<&Path>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let references = config
        .references()?
        .ok_or_else(|| CliError::config_error("build-table requires reference_dir"))?;

    let table = build_table(&references);
    let artifact = TableArtifact::from_table(&table, Some(&references));

    match output {
        Some(path) => {
            artifact.write_to_file(path)?;
            log_event_with_fields(
                Event::TableWritten,
                &[
                    ("path", path.display().to_string().as_str()),
                    ("keys", table.len().to_string().as_str()),
                ],
            );
            write_response(&json!({
                "written": path,
                "keys": table.len(),
            }))
        }
        None => write_json(&artifact.to_json()?),
    }
}

/// Infer one project's scheme and print the full inference.
pub fn infer(config_path: &Path, project_dir: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let (table, _) = config.resolve_table()?;
    let report = infer_project(&table, project_dir)?;
    write_response(&report)
}

/// Infer and persist one project's scheme.
pub fn write_settings(
    config_path: &Path,
    project_dir: &Path,
    language: Option<&str>,
    translation_id: Option<&str>,
) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let (table, _) = config.resolve_table()?;
    let report = settings_for_project(&table, project_dir, language, translation_id)?;
    write_response(&report)
}

/// Run write-settings over every project folder under `projects_dir`.
///
/// A failing project is logged and counted; the batch continues.
pub fn batch(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let projects_dir = config
        .projects_dir
        .clone()
        .ok_or_else(|| CliError::config_error("batch requires projects_dir"))?;
    let (table, _) = config.resolve_table()?;

    let summary = run_batch(&table, &projects_dir)?;
    write_response(&summary)
}

/// Scans a project and runs the candidate engine over it.
pub fn infer_project(table: &DivergenceTable, project_dir: &Path) -> CliResult<ProjectReport> {
    let project = ProjectSource::open(project_dir)?;
    log_event_with_fields(
        Event::ScanStart,
        &[
            ("project", project_dir.display().to_string().as_str()),
            ("books", project.book_ids().count().to_string().as_str()),
        ],
    );

    let engine = CandidateEngine::new(table);
    let inference = engine.determine(BoundaryScanner::new(project.books(), table));
    let checkpoint_scheme = cross_check(&project, &inference);
    // Lines lost to a read error would be wrong evidence, not missing evidence.
    project.finish_reads()?;

    Ok(ProjectReport {
        project: project_dir.to_path_buf(),
        inference,
        checkpoint_scheme,
    })
}

/// Runs the checkpoint decision tree and flags disagreement.
///
/// The engine's answer stands either way.
fn cross_check(project: &ProjectSource, inference: &Inference) -> Option<VersificationScheme> {
    let events: Vec<BoundaryEvent> =
        BoundaryScanner::unfiltered(project.books_where(Checkpoints::is_checkpoint_book)).collect();
    let legacy = Checkpoints::from_events(&events).conclude(project.has_old_testament())?;

    let engine_scheme = inference.determination.scheme;
    if legacy != engine_scheme {
        log_event_with_fields(
            Event::CheckpointDivergence,
            &[
                ("project", project.dir().display().to_string().as_str()),
                ("engine", engine_scheme.name()),
                ("checkpoint", legacy.name()),
            ],
        );
    }
    Some(legacy)
}

/// Writes the record (and Settings.xml when a language is known).
///
/// A project that already has a record is reported as skipped without
/// scanning it.
pub fn settings_for_project(
    table: &DivergenceTable,
    project_dir: &Path,
    language: Option<&str>,
    translation_id: Option<&str>,
) -> CliResult<SettingsReport> {
    let emitter = SettingsEmitter::new(project_dir)?;

    if emitter.record_path().is_file() {
        let record = read_record(project_dir)?;
        let determination = record
            .determination()
            .map_err(|reason| SettingsError::InvalidRecord {
                path: emitter.record_path(),
                reason,
            })?;
        log_event_with_fields(
            Event::RecordSkipped,
            &[("path", emitter.record_path().display().to_string().as_str())],
        );
        return Ok(SettingsReport {
            project: project_dir.to_path_buf(),
            status: RecordStatus::Skipped,
            determination,
            settings_xml: None,
        });
    }

    let report = infer_project(table, project_dir)?;
    let determination = report.inference.determination;

    let status = match emitter.emit_record(&determination)? {
        EmitOutcome::Written(_) => RecordStatus::Written,
        EmitOutcome::Skipped(_) => RecordStatus::Skipped,
    };

    let settings_xml = match language {
        Some(language) => {
            let translation_id = match translation_id {
                Some(id) => id.to_string(),
                None => project_name(project_dir)?,
            };
            match emitter.emit_settings_xml(&determination, language, &translation_id)? {
                EmitOutcome::Written(path) => Some(path),
                EmitOutcome::Skipped(_) => None,
            }
        }
        None => None,
    };

    Ok(SettingsReport {
        project: project_dir.to_path_buf(),
        status,
        determination,
        settings_xml,
    })
}

/// Processes every subdirectory of `projects_dir`, in name order.
pub fn run_batch(table: &DivergenceTable, projects_dir: &Path) -> CliResult<BatchSummary> {
    let mut projects: Vec<PathBuf> = fs::read_dir(projects_dir)
        .map_err(|e| {
            CliError::io_error(format!("Failed to list {}: {}", projects_dir.display(), e))
        })?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    projects.sort();

    let mut summary = BatchSummary::default();
    for project_dir in projects {
        let name = project_name(&project_dir)?;
        let language = language_code_from_folder(&name);

        match settings_for_project(table, &project_dir, Some(language), Some(&name)) {
            Ok(report) => {
                match report.status {
                    RecordStatus::Written => summary.written += 1,
                    RecordStatus::Skipped => summary.skipped += 1,
                }
                summary.projects.push(report);
            }
            Err(e) => {
                log_event_with_fields(
                    Event::ProjectFailed,
                    &[
                        ("project", project_dir.display().to_string().as_str()),
                        ("code", e.code_str()),
                        ("message", e.message()),
                    ],
                );
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Language code encoded in a project folder name: everything before the
/// first `-` or `_`.
pub fn language_code_from_folder(name: &str) -> &str {
    name.split(|c: char| c == '-' || c == '_').next().unwrap_or(name)
}

fn project_name(project_dir: &Path) -> CliResult<String> {
    let resolved = fs::canonicalize(project_dir).map_err(|e| {
        CliError::io_error(format!("Failed to resolve {}: {}", project_dir.display(), e))
    })?;
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CliError::config_error(format!("Project has no folder name: {}", project_dir.display()))
        })
}
