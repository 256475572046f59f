//! Command-line interface for coachpass.
//!
//! This module provides the CLI structure for the `coachpass` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AssignCommand, CheckCommand, ConfigCommand, LoadCommand, OutputFormat, RecordsCommand,
    ScanCommand, StatusCommand,
};

/// coachpass - offline flight-type checks and coach assignments
///
/// Looks up flights in an uploaded reference table, records passenger coach
/// assignments locally, and hands them off between devices as QR codes.
#[derive(Debug, Parser)]
#[command(name = "coachpass")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace the flight reference table from a spreadsheet
    Load(LoadCommand),

    /// Look up a flight's type and name
    Check(CheckCommand),

    /// Record a coach assignment and emit its QR code
    Assign(AssignCommand),

    /// List stored assignment records
    Records(RecordsCommand),

    /// Decode assignment QR codes from image files
    Scan(ScanCommand),

    /// Show store and reference table status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
