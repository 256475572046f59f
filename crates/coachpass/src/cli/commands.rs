//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Load command arguments.
#[derive(Debug, Args)]
pub struct LoadCommand {
    /// The reference spreadsheet (.xlsx, .xls, or .csv)
    pub file: PathBuf,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// The flight number to look up (case-insensitive)
    pub flight_number: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Assign command arguments.
#[derive(Debug, Args)]
pub struct AssignCommand {
    /// The flight number to assign a coach to
    pub flight_number: String,

    /// The coach number, e.g. COACH-001
    #[arg(short = 'n', long)]
    pub coach: String,

    /// Where to write the QR code image (default: ./<flight>-<coach>.png)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output the saved record as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Records command arguments.
#[derive(Debug, Args)]
pub struct RecordsCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Scan command arguments.
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// QR image files to scan, tried in order until one decodes
    #[arg(required = true)]
    pub frames: Vec<PathBuf>,

    /// Output the decoded payload as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration management commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// Path to the file to validate (default: the standard location)
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON array
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_value_enum() {
        assert_eq!(
            OutputFormat::from_str("table", true).unwrap(),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from_str("json", true).unwrap(),
            OutputFormat::Json
        );
    }
}
