//! Error types for bmitrack.
//!
//! This module defines all error types used throughout the bmitrack crate.
//! Validation errors are raised before any storage is touched; storage errors
//! are treated as fatal for the command that triggered them.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for bmitrack operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// User input was missing, non-numeric, or out of range.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The input field that was rejected.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    /// Password generation failed.
    #[error(transparent)]
    Password(#[from] bmitrack_passgen::PasswordError),

    // === I/O Errors ===
    /// Writing an export file failed.
    #[error("failed to export to {path}: {source}")]
    Export {
        /// Destination chosen by the caller.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Appending to the feedback file failed.
    #[error("failed to write feedback to {path}: {source}")]
    FeedbackWrite {
        /// Path to the feedback file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for bmitrack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for the given input field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Check if this error was caused by invalid user input.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        match self {
            Self::Validation { .. } => true,
            Self::Password(err) => err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error is an export destination failure.
    #[must_use]
    pub fn is_export_error(&self) -> bool {
        matches!(self, Self::Export { .. })
    }
}
