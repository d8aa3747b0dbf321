//! Application context and BMI command handlers.
//!
//! [`App`] owns everything a BMI command needs: the loaded configuration,
//! the record store and the feedback log. It is created once at startup and
//! closed at shutdown. Every handler runs synchronously and its errors end
//! with the command that raised them.

use std::path::Path;

use tracing::{debug, warn};

use crate::bmi::record_measurement;
use crate::config::Config;
use crate::error::Result;
use crate::export::{export_user, ExportOutcome};
use crate::feedback::FeedbackLog;
use crate::record::BmiRecord;
use crate::storage::{Storage, StorageStats};
use crate::trend::TrendChart;

/// The running application.
#[derive(Debug)]
pub struct App {
    config: Config,
    storage: Storage,
    feedback: FeedbackLog,
}

impl App {
    /// Open the database and feedback log named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: Config) -> Result<Self> {
        let storage = Storage::open(config.database_path())?;
        Ok(Self::with_storage(config, storage))
    }

    /// Build an application around an already opened store.
    #[must_use]
    pub fn with_storage(config: Config, storage: Storage) -> Self {
        let feedback = FeedbackLog::new(config.feedback_path());
        Self {
            config,
            storage,
            feedback,
        }
    }

    /// Release the database connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection does not close cleanly.
    pub fn close(self) -> Result<()> {
        debug!("Shutting down");
        self.storage.close()
    }

    /// Close the application after a handler returned `result`.
    ///
    /// The handler's own error wins over a close failure, which is then only
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns the handler's error, or the close error if the handler
    /// succeeded.
    pub fn finish<T, E>(self, result: std::result::Result<T, E>) -> std::result::Result<T, E>
    where
        E: From<crate::error::Error>,
    {
        match (result, self.close()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(close_err)) => Err(close_err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!(error = %close_err, "Failed to close database");
                Err(err)
            }
        }
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The record store.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Compute, classify and store a measurement from form input.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input; nothing is stored in that case.
    pub fn calculate(&self, username: &str, weight: &str, height: &str) -> Result<BmiRecord> {
        record_measurement(&self.storage, username, weight, height)
    }

    /// A user's records, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn records(&self, username: &str) -> Result<Vec<BmiRecord>> {
        self.storage.query_by_user(username.trim())
    }

    /// The trend chart for a user, or `None` when there is no history.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn history(&self, username: &str) -> Result<Option<TrendChart>> {
        let username = username.trim();
        let records = self.storage.query_by_user(username)?;
        Ok(TrendChart::from_records(username, &records))
    }

    /// Export a user's history to a caller-chosen path.
    ///
    /// # Errors
    ///
    /// Returns an export error if `path` cannot be written.
    pub fn export(&self, username: &str, path: &Path) -> Result<ExportOutcome> {
        export_user(&self.storage, username.trim(), path)
    }

    /// Append feedback; returns `false` when the text was blank.
    ///
    /// # Errors
    ///
    /// Returns an error if the feedback file cannot be written.
    pub fn submit_feedback(&self, text: &str) -> Result<bool> {
        self.feedback.append(text)
    }

    /// Store statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn stats(&self) -> Result<StorageStats> {
        self.storage.stats()
    }
}
