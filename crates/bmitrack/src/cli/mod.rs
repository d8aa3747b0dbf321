//! Command-line interface for bmitrack.
//!
//! This module provides the CLI structure for the `bmitrack` binary. Each
//! subcommand maps to one handler on [`crate::App`].

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CalcCommand, ConfigCommand, ExportCommand, FeedbackCommand, HistoryCommand, PasswordCommand,
    StatusCommand,
};

/// bmitrack - Track BMI over time and generate passwords
///
/// Records BMI measurements per user, charts each user's trend, exports
/// history to CSV, and generates random passwords.
#[derive(Debug, Parser)]
#[command(name = "bmitrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug)
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
    /// Calculate BMI and record it
    Calc(CalcCommand),

    /// Show a user's BMI trend
    History(HistoryCommand),

    /// Export a user's history to CSV
    Export(ExportCommand),

    /// Leave feedback
    Feedback(FeedbackCommand),

    /// Generate a random password
    Password(PasswordCommand),

    /// Show database status
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
