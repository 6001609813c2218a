//! CLI module for versifier
//!
//! Provides command-line interface for:
//! - build-table: Build the divergence table from reference files
//! - infer: Infer one project's versification and print it
//! - write-settings: Infer and persist the result into a project
//! - batch: write-settings over a directory of projects

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{
    batch, build, infer, infer_project, language_code_from_folder, run, run_batch, run_command,
    settings_for_project, write_settings, BatchSummary, ProjectReport, RecordStatus,
    SettingsReport,
};
pub use config::{Config, TableSource};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_response};
