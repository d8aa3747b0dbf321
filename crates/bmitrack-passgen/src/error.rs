//! Error types for password generation.

use thiserror::Error;

/// Errors that can occur while generating or publishing a password.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// The requested length is not an integer in `1..=MAX_LENGTH`.
    #[error(
        "invalid password length '{input}': must be an integer from 1 to {}",
        crate::generator::MAX_LENGTH
    )]
    InvalidLength {
        /// The rejected input, as the user supplied it.
        input: String,
    },

    /// The selected character classes minus the exclusions left nothing to draw from.
    #[error("no valid characters selected")]
    NoCharactersAvailable,

    /// Failed to access the system clipboard.
    #[error("clipboard access failed: {0}")]
    Clipboard(String),
}

/// Result type for password operations.
pub type Result<T> = std::result::Result<T, PasswordError>;

impl PasswordError {
    /// Check if this error was caused by user input rather than the environment.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidLength { .. } | Self::NoCharactersAvailable
        )
    }
}
