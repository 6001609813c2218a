//! Configuration file
//!
//! ```json
//! {
//!   "reference_dir": "/data/vrs",
//!   "table_path": "/data/divergence_table.json",
//!   "projects_dir": "/data/projects",
//!   "verify_table": true
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event};
use crate::reference::{build_table, DivergenceTable, ReferenceSet, TableArtifact};

use super::args::DEFAULT_CONFIG_PATH;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding org.vrs, lxx.vrs, vul.vrs, eng.vrs, rsc.vrs and rso.vrs
    #[serde(default)]
    pub reference_dir: Option<PathBuf>,

    /// Divergence table artifact
    #[serde(default)]
    pub table_path: Option<PathBuf>,

    /// Directory whose subdirectories are translation projects
    #[serde(default)]
    pub projects_dir: Option<PathBuf>,

    /// Check the artifact's checksums against reference_dir (default true)
    #[serde(default = "default_verify_table")]
    pub verify_table: bool,
}

fn default_verify_table() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_dir: None,
            table_path: None,
            projects_dir: None,
            verify_table: default_verify_table(),
        }
    }
}

/// Where the divergence table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    Artifact,
    References,
    Shipped,
}

impl TableSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableSource::Artifact => "artifact",
            TableSource::References => "references",
            TableSource::Shipped => "shipped",
        }
    }
}

impl Config {
    /// Load configuration from file.
    ///
    /// A missing file at the default path yields the defaults; a missing
    /// file at any other path is an error.
    pub fn load(path: &Path) -> CliResult<Self> {
        let config = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound && path == Path::new(DEFAULT_CONFIG_PATH) => {
                Config::default()
            }
            Err(e) => {
                return Err(CliError::config_error(format!(
                    "Failed to read config {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        config.validate()?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );

        Ok(config)
    }

    /// Rejects directories that are set but do not exist.
    pub fn validate(&self) -> CliResult<()> {
        for (name, dir) in [
            ("reference_dir", &self.reference_dir),
            ("projects_dir", &self.projects_dir),
        ] {
            if let Some(dir) = dir {
                if !dir.is_dir() {
                    return Err(CliError::config_error(format!(
                        "{} is not a directory: {}",
                        name,
                        dir.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Loads the reference set when `reference_dir` is configured.
    pub fn references(&self) -> CliResult<Option<ReferenceSet>> {
        match &self.reference_dir {
            Some(dir) => Ok(Some(ReferenceSet::load(dir)?)),
            None => Ok(None),
        }
    }

    /// Picks the divergence table.
    ///
    /// 1. The artifact at `table_path`, when the file exists
    /// 2. A table built from `reference_dir`
    /// 3. The shipped table
    pub fn resolve_table(&self) -> CliResult<(DivergenceTable, TableSource)> {
        if let Some(path) = self.table_path.as_deref().filter(|p| p.is_file()) {
            let artifact = TableArtifact::read_from_file(path)?;
            if self.verify_table {
                if let Some(references) = self.references()? {
                    artifact.verify_against(&references)?;
                }
            }
            let table = artifact.into_table()?;
            log_table_loaded(TableSource::Artifact, &table);
            return Ok((table, TableSource::Artifact));
        }

        if let Some(references) = self.references()? {
            return Ok((build_table(&references), TableSource::References));
        }

        let table = DivergenceTable::shipped()?;
        log_table_loaded(TableSource::Shipped, &table);
        Ok((table, TableSource::Shipped))
    }
}

fn log_table_loaded(source: TableSource, table: &DivergenceTable) {
    log_event_with_fields(
        Event::TableLoaded,
        &[
            ("source", source.as_str()),
            ("keys", table.len().to_string().as_str()),
        ],
    );
}
