//! CSV export of a user's history.
//!
//! The document is serialized in memory first and written to the destination
//! in one call, so a serialization failure never touches an existing file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{BmiRecord, LEGACY_TIMESTAMP_FORMAT};
use crate::storage::Storage;

/// Column headers, in order.
pub const EXPORT_HEADERS: [&str; 5] = ["Weight", "Height", "BMI", "Category", "Timestamp"];

/// Outcome of an export request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The user has no records; nothing was written.
    NoData,
    /// The file was written.
    Written {
        /// Destination path.
        path: PathBuf,
        /// Number of data rows, excluding the header.
        rows: usize,
    },
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Weight")]
    weight: f64,
    #[serde(rename = "Height")]
    height: f64,
    #[serde(rename = "BMI")]
    bmi: f64,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Timestamp")]
    timestamp: String,
}

impl<'a> From<&'a BmiRecord> for ExportRow<'a> {
    fn from(record: &'a BmiRecord) -> Self {
        Self {
            weight: record.weight,
            height: record.height,
            bmi: record.bmi,
            category: record.category.label(),
            timestamp: record.timestamp.format(LEGACY_TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Serialize records to CSV bytes, header first.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_csv(records: &[BmiRecord]) -> Result<Vec<u8>> {
    // Header written explicitly so an empty history still gets one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        writer.serialize(ExportRow::from(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))
}

/// Export `username`'s history to `path`.
///
/// # Errors
///
/// Returns [`Error::Export`] if the destination cannot be written, or a
/// storage error if the history cannot be read.
pub fn export_user(store: &Storage, username: &str, path: &Path) -> Result<ExportOutcome> {
    let records = store.query_by_user(username)?;
    if records.is_empty() {
        debug!(username, "No records to export");
        return Ok(ExportOutcome::NoData);
    }

    let bytes = to_csv(&records)?;
    std::fs::write(path, bytes).map_err(|source| Error::Export {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        username,
        rows = records.len(),
        "Exported history to {}",
        path.display()
    );
    Ok(ExportOutcome::Written {
        path: path.to_path_buf(),
        rows: records.len(),
    })
}
