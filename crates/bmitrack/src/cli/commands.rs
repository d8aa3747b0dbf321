//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use bmitrack_passgen::{parse_length, PasswordRequest};
use clap::{Args, Subcommand};

use crate::config::PasswordConfig;
use crate::error::Result;

/// Calculate command arguments.
#[derive(Debug, Args)]
pub struct CalcCommand {
    /// Username the measurement belongs to
    #[arg(short, long)]
    pub user: String,

    /// Weight in kilograms
    #[arg(short, long, allow_hyphen_values = true)]
    pub weight: String,

    /// Height in meters
    #[arg(long, allow_hyphen_values = true)]
    pub height: String,

    /// Output the stored record as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Username whose history to show
    pub user: String,

    /// Output the records as JSON instead of a chart
    #[arg(short, long)]
    pub json: bool,

    /// Chart width in columns (defaults to the configured width)
    #[arg(long)]
    pub width: Option<u16>,

    /// Chart height in rows (defaults to the configured height)
    #[arg(long)]
    pub height: Option<u16>,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Username whose history to export
    pub user: String,

    /// Destination CSV file
    pub path: PathBuf,
}

/// Feedback command arguments.
#[derive(Debug, Args)]
pub struct FeedbackCommand {
    /// Feedback text (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

impl FeedbackCommand {
    /// The feedback as a single line.
    #[must_use]
    pub fn message(&self) -> String {
        self.text.join(" ")
    }
}

/// Password command arguments.
#[derive(Debug, Args)]
pub struct PasswordCommand {
    /// Number of characters (defaults to the configured length)
    #[arg(short, long, allow_hyphen_values = true)]
    pub length: Option<String>,

    /// Leave out ASCII letters
    #[arg(long)]
    pub no_letters: bool,

    /// Leave out digits
    #[arg(long)]
    pub no_numbers: bool,

    /// Leave out punctuation
    #[arg(long)]
    pub no_symbols: bool,

    /// Characters that must never appear
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    pub exclude: String,

    /// Copy the password to the system clipboard
    ///
    /// On Linux the clipboard empties once its owner exits, so the command
    /// keeps serving the password until another application copies something
    /// or `password.clipboard_hold_secs` elapses (no clipboard manager needed).
    #[arg(long)]
    pub copy: bool,
}

impl PasswordCommand {
    /// Combine these flags with the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `--length` is not an integer in
    /// `1..=MAX_LENGTH`.
    pub fn to_request(&self, defaults: &PasswordConfig) -> Result<PasswordRequest> {
        let mut request = defaults.to_request();
        if let Some(input) = &self.length {
            request.length = parse_length(input)?;
        }
        request.use_letters &= !self.no_letters;
        request.use_numbers &= !self.no_numbers;
        request.use_symbols &= !self.no_symbols;
        Ok(request.with_exclude(self.exclude.clone()))
    }
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
