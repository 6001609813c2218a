//! CLI argument definitions using clap
//!
//! Commands:
//! - versifier build-table --config <path> [--output <path>]
//! - versifier infer --config <path> --project <dir>
//! - versifier write-settings --config <path> --project <dir>
//! - versifier batch --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration path
pub const DEFAULT_CONFIG_PATH: &str = "./versifier.json";

/// versifier - infers which versification scheme a Bible translation follows
#[derive(Parser, Debug)]
#[command(name = "versifier")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the divergence table from reference .vrs files
    BuildTable {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Write the table artifact here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Infer the versification of one project and print the result
    Infer {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Project directory containing USFM files
        #[arg(long)]
        project: PathBuf,
    },

    /// Infer and write versification.json (and Settings.xml) into a project
    WriteSettings {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Project directory containing USFM files
        #[arg(long)]
        project: PathBuf,

        /// ISO language code; Settings.xml is written only when given
        #[arg(long)]
        language: Option<String>,

        /// Translation id used for book file names; defaults to the folder name
        #[arg(long)]
        translation_id: Option<String>,
    },

    /// Run write-settings over every project under projects_dir
    Batch {
        /// Path to configuration file
        #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_write_settings() {
        let cli = Cli::try_parse_from([
            "versifier",
            "write-settings",
            "--project",
            "/tmp/eng-web",
            "--language",
            "eng",
        ])
        .unwrap();

        match cli.command {
            Command::WriteSettings {
                config,
                project,
                language,
                translation_id,
            } => {
                assert_eq!(config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert_eq!(project, PathBuf::from("/tmp/eng-web"));
                assert_eq!(language.as_deref(), Some("eng"));
                assert_eq!(translation_id, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_infer_requires_project() {
        assert!(Cli::try_parse_from(["versifier", "infer"]).is_err());
    }
}
