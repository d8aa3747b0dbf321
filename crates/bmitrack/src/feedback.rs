//! Append-only feedback log.
//!
//! Each submission becomes one newline-terminated line. The file is never
//! read back by the application.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Writer for the feedback file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    /// Create a log that appends to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the feedback file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one feedback entry.
    ///
    /// Blank input is ignored and `false` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FeedbackWrite`] if the file cannot be opened or written.
    pub fn append(&self, text: &str) -> Result<bool> {
        if text.trim().is_empty() {
            debug!("Ignoring empty feedback");
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let write_err = |source| Error::FeedbackWrite {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        writeln!(file, "{text}").map_err(write_err)?;

        info!("Recorded feedback in {}", self.path.display());
        Ok(true)
    }
}
